use crate::models::AudioFeatures;

/// Cosine similarity between two feature vectors
///
/// Returns 0.0 when either vector has zero magnitude.
pub fn cosine_similarity(a: &AudioFeatures, b: &AudioFeatures) -> f64 {
    let norm_a = a.magnitude();
    let norm_b = b.magnitude();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    a.dot(b) / (norm_a * norm_b)
}
