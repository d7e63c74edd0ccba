use thiserror::Error;

/// Violation d'un invariant de cardinalité ou de plage sur un jeu, un tirage ou une grille.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Nombre de numéros par tirage {pick} hors limites (1-{balls} exclus)")]
    PickCountOutOfRange { pick: usize, balls: u8 },

    #[error("Le pool bonus doit contenir au moins un numéro")]
    EmptyBonusPool,

    #[error("Attendu {expected} numéros, reçu {actual}")]
    WrongCount { expected: usize, actual: usize },

    #[error("Numéro {number} hors limites (1-{max})")]
    OutOfRange { number: u8, max: u8 },

    #[error("Numéro en double : {0}")]
    Duplicate(u8),

    #[error("Bonus {bonus} hors limites (1-{max})")]
    BonusOutOfRange { bonus: u8, max: u8 },

    #[error("Bonus fourni alors que le jeu n'a pas de pool bonus")]
    UnexpectedBonus,

    #[error("Tirage #{index} : {source}")]
    InvalidDraw {
        index: usize,
        #[source]
        source: Box<ValidationError>,
    },
}

pub type Result<T> = std::result::Result<T, ValidationError>;
