pub mod cyclical;
pub mod delta;
pub mod equilibrium;
pub mod frequency;
pub mod genetic;
pub mod markov;
pub mod monte_carlo;
pub mod overdue;
pub mod pattern;
pub mod wheeling;

use std::str::FromStr;

use chrono::NaiveDate;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use lotto_model::{Candidate, Draw, DrawDataset, GameConfig};

use crate::analysis::Analyzer;
use crate::config::EngineConfig;
use crate::ensemble::HybridStrategy;
use crate::error::EngineError;
use crate::sampler::Selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Frequency,
    Overdue,
    Pattern,
    Statistical,
    Wheeling,
    Delta,
    Markov,
    Genetic,
    #[clap(name = "montecarlo")]
    MonteCarlo,
    Fourier,
    Hybrid,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 11] = [
        StrategyKind::Frequency,
        StrategyKind::Overdue,
        StrategyKind::Pattern,
        StrategyKind::Statistical,
        StrategyKind::Wheeling,
        StrategyKind::Delta,
        StrategyKind::Markov,
        StrategyKind::Genetic,
        StrategyKind::MonteCarlo,
        StrategyKind::Fourier,
        StrategyKind::Hybrid,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::Frequency => "frequency",
            StrategyKind::Overdue => "overdue",
            StrategyKind::Pattern => "pattern",
            StrategyKind::Statistical => "statistical",
            StrategyKind::Wheeling => "wheeling",
            StrategyKind::Delta => "delta",
            StrategyKind::Markov => "markov",
            StrategyKind::Genetic => "genetic",
            StrategyKind::MonteCarlo => "montecarlo",
            StrategyKind::Fourier => "fourier",
            StrategyKind::Hybrid => "hybrid",
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        StrategyKind::ALL
            .iter()
            .copied()
            .find(|k| k.name() == key)
            .ok_or_else(|| EngineError::UnknownStrategy(s.to_string()))
    }
}

/// Repli déclenché pendant une prédiction. Jamais silencieux : il est
/// remonté dans `Prediction::fallback` et journalisé.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fallback {
    /// Poids restant nul, fin de sélection uniforme
    UniformWeights,
    /// Aucune combinaison équilibrée trouvée, stratégie fréquence utilisée
    EquilibriumExhausted,
    /// Marche par écarts incomplète, `filled` numéros complétés au hasard
    DeltaFill { filled: usize },
}

#[derive(Debug, Clone)]
pub struct Prediction {
    pub candidate: Candidate,
    /// Score par numéro, indexé par `numéro - 1`
    pub scores: Vec<f64>,
    pub fallback: Option<Fallback>,
}

impl Prediction {
    pub(crate) fn from_selection(selection: Selection, scores: Vec<f64>) -> Self {
        Self {
            candidate: Candidate::from_distinct(selection.numbers),
            scores,
            fallback: selection.fallback.then_some(Fallback::UniformWeights),
        }
    }
}

/// Entrées partagées par toutes les stratégies.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub dataset: &'a DrawDataset,
    pub analyzer: Analyzer<'a>,
}

impl<'a> Context<'a> {
    pub fn new(dataset: &'a DrawDataset) -> Self {
        Self {
            dataset,
            analyzer: Analyzer::new(dataset),
        }
    }

    pub fn config(&self) -> &'a GameConfig {
        self.dataset.config()
    }

    pub fn pick_count(&self) -> usize {
        self.config().pick_count()
    }

    pub fn ball_count(&self) -> u8 {
        self.config().ball_count()
    }
}

pub trait Strategy {
    fn kind(&self) -> StrategyKind;
    /// Retourne toujours K numéros distincts de `1..=N`, triés.
    fn predict(&self, ctx: &Context<'_>, rng: &mut dyn RngCore) -> Prediction;
}

pub fn build_strategy(kind: StrategyKind, config: &EngineConfig) -> Box<dyn Strategy> {
    match kind {
        StrategyKind::Frequency => Box::new(frequency::FrequencyStrategy),
        StrategyKind::Overdue => Box::new(overdue::OverdueStrategy),
        StrategyKind::Pattern => Box::new(pattern::PatternStrategy),
        StrategyKind::Statistical => Box::new(equilibrium::EquilibriumStrategy::new(
            config.equilibrium_attempts,
            config.equilibrium_sum_tolerance,
        )),
        StrategyKind::Wheeling => Box::new(wheeling::WheelingStrategy::new(
            config.wheel_key_size,
            config.max_wheel_keys,
        )),
        StrategyKind::Delta => {
            Box::new(delta::DeltaStrategy::new(config.delta_top, config.delta_max_seed))
        }
        StrategyKind::Markov => Box::new(markov::MarkovStrategy),
        StrategyKind::Genetic => Box::new(genetic::GeneticStrategy::new(config.genetic.clone())),
        StrategyKind::MonteCarlo => {
            Box::new(monte_carlo::MonteCarloStrategy::new(config.monte_carlo_iterations))
        }
        StrategyKind::Fourier => Box::new(cyclical::CyclicalStrategy),
        StrategyKind::Hybrid => Box::new(HybridStrategy::from_config(config)),
    }
}

/// Historique de test : `draws[0]` est le plus récent, un tirage par jour.
pub fn make_test_dataset(config: GameConfig, draws: &[&[u8]]) -> DrawDataset {
    let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap_or_default();
    let draws = draws
        .iter()
        .enumerate()
        .map(|(i, numbers)| {
            let mut numbers = numbers.to_vec();
            numbers.sort_unstable();
            Draw {
                date: start - chrono::Days::new(i as u64),
                numbers,
                bonus: None,
                jackpot: None,
            }
        })
        .collect();
    // Les tirages de test sont écrits à la main : une erreur ici est un bug du test
    DrawDataset::new(config, draws).unwrap_or_else(|e| panic!("tirages de test invalides : {e}"))
}
