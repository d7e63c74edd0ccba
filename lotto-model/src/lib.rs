pub mod dataset;
pub mod error;
pub mod models;

pub use dataset::DrawDataset;
pub use error::ValidationError;
pub use models::{validate_numbers, Candidate, Draw, GameConfig, ScoredCandidate};
