use std::collections::HashMap;

use rand::RngCore;
use tracing::info;

use lotto_model::{Candidate, DrawDataset, ScoredCandidate};

use crate::analysis::{Analyzer, Statistics};
use crate::confidence::{confidence, ConfidenceBreakdown};
use crate::config::EngineConfig;
use crate::constraints::{generate_sets, Constraints};
use crate::ensemble::StrategyWeights;
use crate::error::Result;
use crate::strategies::{build_strategy, Context, Prediction, StrategyKind};

/// Point d'entrée : possède la configuration, emprunte les historiques.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn analyze(&self, dataset: &DrawDataset) -> Statistics {
        Analyzer::new(dataset).statistics()
    }

    /// `weights` remplace les poids du mode hybride pour cet appel seulement.
    pub fn predict(
        &self,
        kind: StrategyKind,
        dataset: &DrawDataset,
        weights: Option<&StrategyWeights>,
        rng: &mut dyn RngCore,
    ) -> Result<Prediction> {
        let strategy = match weights {
            Some(weights) => {
                weights.validate()?;
                let config = EngineConfig {
                    weights: weights.clone(),
                    ..self.config.clone()
                };
                build_strategy(kind, &config)
            }
            None => build_strategy(kind, &self.config),
        };
        Ok(strategy.predict(&Context::new(dataset), rng))
    }

    pub fn generate_sets(
        &self,
        count: usize,
        kind: StrategyKind,
        constraints: Constraints,
        dataset: &DrawDataset,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<ScoredCandidate>> {
        let strategy = build_strategy(kind, &self.config);
        generate_sets(
            count,
            strategy.as_ref(),
            constraints,
            dataset,
            self.config.constraint_attempts,
            rng,
        )
    }

    pub fn confidence(&self, candidate: &Candidate, dataset: &DrawDataset) -> Result<u8> {
        confidence(candidate, dataset)
    }

    pub fn confidence_breakdown(
        &self,
        candidate: &Candidate,
        dataset: &DrawDataset,
    ) -> Result<ConfidenceBreakdown> {
        ConfidenceBreakdown::compute(candidate, dataset)
    }

    /// Valide les numéros contre la configuration du jeu avant de noter la grille.
    pub fn confidence_of(&self, numbers: &[u8], dataset: &DrawDataset) -> Result<u8> {
        let candidate = Candidate::new(dataset.config(), numbers)?;
        self.confidence(&candidate, dataset)
    }

    /// Met à jour les poids réglables du mode hybride pour les appels suivants.
    pub fn set_strategy_weights(&mut self, weights: &HashMap<String, f64>) -> Result<()> {
        self.config.weights.apply(weights)?;
        info!(
            frequency = self.config.weights.frequency,
            overdue = self.config.weights.overdue,
            pattern = self.config.weights.pattern,
            statistical = self.config.weights.statistical,
            "poids des stratégies mis à jour"
        );
        Ok(())
    }
}
