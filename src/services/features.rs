//! Feature extraction and tempo normalization.

use crate::models::{AudioFeatures, TrackRecord};

/// A scorable track: its id is known and all five features are present
#[derive(Debug, Clone, Copy)]
pub struct ValidTrack<'a> {
    pub spotify_track_id: &'a str,
    pub record: &'a TrackRecord,
}

/// Tracks that carry an id and all five audio features, paired with their vectors
///
/// `features[i]` belongs to `tracks[i]`; both keep the input order, duplicates included.
#[derive(Debug, Default)]
pub struct ValidatedTracks<'a> {
    pub features: Vec<AudioFeatures>,
    pub tracks: Vec<ValidTrack<'a>>,
}

impl ValidatedTracks<'_> {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Extracts feature vectors, silently dropping tracks with no id or any feature missing
pub fn extract_features(tracks: &[TrackRecord]) -> ValidatedTracks<'_> {
    let mut validated = ValidatedTracks::default();

    for track in tracks {
        match (track.spotify_track_id.as_deref(), track.features()) {
            (Some(spotify_track_id), Some(features)) => {
                validated.features.push(features);
                validated.tracks.push(ValidTrack {
                    spotify_track_id,
                    record: track,
                });
            }
            (spotify_track_id, _) => {
                tracing::trace!(
                    spotify_track_id = spotify_track_id.unwrap_or("<none>"),
                    missing = ?track.missing_features(),
                    "Skipping track without complete audio features"
                );
            }
        }
    }

    tracing::debug!(
        input = tracks.len(),
        valid = validated.len(),
        skipped = tracks.len() - validated.len(),
        "Extracted audio features"
    );

    validated
}

/// Replaces tempo with its z-score across all rows; other columns pass through
///
/// A single row keeps its raw tempo. A constant tempo column normalizes to `0.0`.
/// The deviation is the population one (divide by `n`).
pub fn normalize_features(features: &[AudioFeatures]) -> Vec<AudioFeatures> {
    let mut normalized = features.to_vec();
    if normalized.len() < 2 {
        return normalized;
    }

    let n = normalized.len() as f64;
    let mean = normalized.iter().map(|f| f.tempo).sum::<f64>() / n;
    let variance = normalized
        .iter()
        .map(|f| (f.tempo - mean).powi(2))
        .sum::<f64>()
        / n;
    let std_dev = variance.sqrt();

    if is_degenerate_scale(std_dev, mean) {
        tracing::debug!(tempo = mean, "Tempo column is constant, normalizing to zero");
        for row in &mut normalized {
            row.tempo = 0.0;
        }
    } else {
        for row in &mut normalized {
            row.tempo = (row.tempo - mean) / std_dev;
        }
    }

    normalized
}

/// Deviations this small are rounding noise from summing identical values
fn is_degenerate_scale(std_dev: f64, mean: f64) -> bool {
    std_dev <= 10.0 * f64::EPSILON * mean.abs().max(1.0)
}
