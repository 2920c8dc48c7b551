use serde::{Deserialize, Deserializer, Serialize};

/// Audio feature columns used for scoring, in vector order
pub const FEATURE_COLUMNS: [&str; 5] = ["danceability", "energy", "valence", "tempo", "acousticness"];

/// A track row as stored for a listener
///
/// Every audio feature is optional: an absent key and an explicit `null` both
/// mean "missing", while `0.0` is a legitimate value. A row without an id is
/// kept but never scored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    #[serde(default)]
    pub spotify_track_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default, deserialize_with = "feature_value")]
    pub danceability: Option<f64>,
    #[serde(default, deserialize_with = "feature_value")]
    pub energy: Option<f64>,
    #[serde(default, deserialize_with = "feature_value")]
    pub valence: Option<f64>,
    #[serde(default, deserialize_with = "feature_value")]
    pub tempo: Option<f64>,
    #[serde(default, deserialize_with = "feature_value")]
    pub acousticness: Option<f64>,
}

impl TrackRecord {
    /// Creates a record with only an identifier
    pub fn new(spotify_track_id: impl Into<String>) -> Self {
        Self {
            spotify_track_id: Some(spotify_track_id.into()),
            ..Default::default()
        }
    }

    /// Sets all five audio features at once
    pub fn with_features(mut self, features: AudioFeatures) -> Self {
        self.danceability = Some(features.danceability);
        self.energy = Some(features.energy);
        self.valence = Some(features.valence);
        self.tempo = Some(features.tempo);
        self.acousticness = Some(features.acousticness);
        self
    }

    /// Feature values in [`FEATURE_COLUMNS`] order; non-finite values count as missing
    fn feature_values(&self) -> [Option<f64>; 5] {
        [
            self.danceability,
            self.energy,
            self.valence,
            self.tempo,
            self.acousticness,
        ]
        .map(|value| value.filter(|v| v.is_finite()))
    }

    /// The complete feature vector, or `None` if any feature is missing
    pub fn features(&self) -> Option<AudioFeatures> {
        let [danceability, energy, valence, tempo, acousticness] = self.feature_values();
        Some(AudioFeatures {
            danceability: danceability?,
            energy: energy?,
            valence: valence?,
            tempo: tempo?,
            acousticness: acousticness?,
        })
    }

    /// Names of the feature columns this record cannot supply
    pub fn missing_features(&self) -> Vec<&'static str> {
        FEATURE_COLUMNS
            .iter()
            .zip(self.feature_values())
            .filter(|(_, value)| value.is_none())
            .map(|(column, _)| *column)
            .collect()
    }
}

/// Accepts JSON numbers, numeric strings and `null`
///
/// Strings that parse to NaN or infinity are treated as missing.
fn feature_value<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(value)) => Ok(Some(value)),
        Some(Raw::Text(text)) => text
            .trim()
            .parse::<f64>()
            .map(|value| Some(value).filter(|v| v.is_finite()))
            .map_err(|e| serde::de::Error::custom(format!("invalid audio feature {:?}: {}", text, e))),
    }
}

/// Fixed-order audio feature vector for one track
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub danceability: f64,
    pub energy: f64,
    pub valence: f64,
    /// Beats per minute; the only column not already on a 0..1 scale
    pub tempo: f64,
    pub acousticness: f64,
}

impl AudioFeatures {
    pub fn new(danceability: f64, energy: f64, valence: f64, tempo: f64, acousticness: f64) -> Self {
        Self {
            danceability,
            energy,
            valence,
            tempo,
            acousticness,
        }
    }

    /// Values in [`FEATURE_COLUMNS`] order
    pub fn to_array(&self) -> [f64; 5] {
        [
            self.danceability,
            self.energy,
            self.valence,
            self.tempo,
            self.acousticness,
        ]
    }

    pub fn from_array(values: [f64; 5]) -> Self {
        let [danceability, energy, valence, tempo, acousticness] = values;
        Self::new(danceability, energy, valence, tempo, acousticness)
    }

    /// Column-wise arithmetic mean, `None` for an empty slice
    pub fn mean(rows: &[AudioFeatures]) -> Option<AudioFeatures> {
        if rows.is_empty() {
            return None;
        }

        let mut sums = [0.0f64; 5];
        for row in rows {
            for (sum, value) in sums.iter_mut().zip(row.to_array()) {
                *sum += value;
            }
        }

        let n = rows.len() as f64;
        Some(Self::from_array(sums.map(|sum| sum / n)))
    }

    pub fn dot(&self, other: &AudioFeatures) -> f64 {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    /// L2 norm
    pub fn magnitude(&self) -> f64 {
        self.dot(self).sqrt()
    }
}
