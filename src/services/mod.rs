pub mod features;
pub mod recommendations;
pub mod recommender;
pub mod similarity;
pub mod store;
