mod recommendation;
mod track;

pub use recommendation::{ProfileRecord, Recommendation, StoredRecommendation};
pub use track::{AudioFeatures, TrackRecord, FEATURE_COLUMNS};
