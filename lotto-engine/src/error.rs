use thiserror::Error;

use lotto_model::ValidationError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Stratégie inconnue : {0}")]
    UnknownStrategy(String),

    #[error("Poids invalide pour '{key}' : {value} (doit être fini et >= 0)")]
    InvalidWeight { key: String, value: f64 },

    #[error("Configuration invalide : {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
