pub mod analysis;
pub mod confidence;
pub mod config;
pub mod constraints;
pub mod engine;
pub mod ensemble;
pub mod error;
pub mod sampler;
pub mod strategies;

pub use analysis::{Analyzer, FrequencyTable, Statistics};
pub use confidence::ConfidenceBreakdown;
pub use config::{EngineConfig, GeneticConfig};
pub use constraints::Constraints;
pub use engine::Engine;
pub use ensemble::StrategyWeights;
pub use error::EngineError;
pub use strategies::{Fallback, Prediction, Strategy, StrategyKind};
