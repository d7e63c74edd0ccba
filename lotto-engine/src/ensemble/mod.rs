use std::collections::HashMap;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::sampler::weighted_select;
use crate::strategies::{build_strategy, Context, Prediction, Strategy, StrategyKind};

/// Poids des stratégies combinées. Aucune normalisation : les poids sont des
/// curseurs indépendants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyWeights {
    pub frequency: f64,
    pub overdue: f64,
    pub pattern: f64,
    pub statistical: f64,
    pub delta: f64,
    pub markov: f64,
    pub genetic: f64,
    pub fourier: f64,
}

impl Default for StrategyWeights {
    fn default() -> Self {
        Self {
            frequency: 0.25,
            overdue: 0.25,
            pattern: 0.25,
            statistical: 0.25,
            delta: 0.15,
            markov: 0.2,
            genetic: 0.25,
            fourier: 0.15,
        }
    }
}

impl StrategyWeights {
    /// Clés modifiables par l'utilisateur.
    pub const ADJUSTABLE: [&'static str; 4] = ["frequency", "overdue", "pattern", "statistical"];

    pub fn entries(&self) -> [(StrategyKind, f64); 8] {
        [
            (StrategyKind::Frequency, self.frequency),
            (StrategyKind::Overdue, self.overdue),
            (StrategyKind::Pattern, self.pattern),
            (StrategyKind::Statistical, self.statistical),
            (StrategyKind::Delta, self.delta),
            (StrategyKind::Markov, self.markov),
            (StrategyKind::Genetic, self.genetic),
            (StrategyKind::Fourier, self.fourier),
        ]
    }

    pub fn validate(&self) -> Result<()> {
        for (kind, value) in self.entries() {
            check_weight(kind.name(), value)?;
        }
        Ok(())
    }

    /// Met à jour les poids réglables. Clés inconnues ignorées avec un avertissement,
    /// rien n'est modifié si une valeur est invalide.
    pub fn apply(&mut self, updates: &HashMap<String, f64>) -> Result<()> {
        for (key, &value) in updates {
            if Self::ADJUSTABLE.contains(&key.as_str()) {
                check_weight(key, value)?;
            }
        }

        for (key, &value) in updates {
            match key.as_str() {
                "frequency" => self.frequency = value,
                "overdue" => self.overdue = value,
                "pattern" => self.pattern = value,
                "statistical" => self.statistical = value,
                other => warn!(key = other, "poids de stratégie inconnu ignoré"),
            }
        }
        Ok(())
    }
}

fn check_weight(key: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(EngineError::InvalidWeight {
            key: key.to_string(),
            value,
        });
    }
    Ok(())
}

/// Crédit positionnel : le i-ème numéro (0-indexé) de la grille triée reçoit
/// `poids × (K − i) / K`.
pub fn positional_credit(scores: &mut [f64], prediction: &Prediction, weight: f64) {
    let k = prediction.candidate.len() as f64;
    for (i, &n) in prediction.candidate.numbers().iter().enumerate() {
        scores[(n - 1) as usize] += weight * (k - i as f64) / k;
    }
}

/// Combinaison des huit stratégies pondérées puis sélection pondérée finale.
pub struct HybridStrategy {
    members: Vec<(Box<dyn Strategy>, f64)>,
}

impl HybridStrategy {
    pub fn from_config(config: &EngineConfig) -> Self {
        let members = config
            .weights
            .entries()
            .into_iter()
            .map(|(kind, weight)| (build_strategy(kind, config), weight))
            .collect();
        Self { members }
    }

    /// Scores agrégés par numéro.
    pub fn aggregate(&self, ctx: &Context<'_>, rng: &mut dyn RngCore) -> Vec<f64> {
        let mut scores = vec![0.0f64; ctx.ball_count() as usize];
        for (strategy, weight) in &self.members {
            let prediction = strategy.predict(ctx, rng);
            if let Some(fallback) = prediction.fallback {
                debug!(strategy = %strategy.kind(), ?fallback, "repli dans une stratégie combinée");
            }
            positional_credit(&mut scores, &prediction, *weight);
        }
        scores
    }
}

impl Strategy for HybridStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Hybrid
    }

    fn predict(&self, ctx: &Context<'_>, rng: &mut dyn RngCore) -> Prediction {
        let scores = self.aggregate(ctx, rng);
        let selection = weighted_select(&scores, ctx.pick_count(), rng);
        Prediction::from_selection(selection, scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::make_test_dataset;
    use lotto_model::{Candidate, DrawDataset, GameConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fast_config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.genetic.population_size = 20;
        config.genetic.generations = 5;
        config
    }

    #[test]
    fn test_positional_credit() {
        let prediction = Prediction {
            candidate: Candidate::from_distinct(vec![2, 5, 9]),
            scores: vec![],
            fallback: None,
        };
        let mut scores = vec![0.0; 10];
        positional_credit(&mut scores, &prediction, 0.3);
        assert!((scores[1] - 0.3).abs() < 1e-12);
        assert!((scores[4] - 0.2).abs() < 1e-12);
        assert!((scores[8] - 0.1).abs() < 1e-12);
        assert_eq!(scores.iter().filter(|&&s| s > 0.0).count(), 3);
    }

    #[test]
    fn test_hybrid_aggregate_total_mass() {
        // Chaque stratégie distribue poids × (K + 1) / 2 au total
        let config = fast_config();
        let mut rng = StdRng::seed_from_u64(21);
        let ds = DrawDataset::synthetic(
            GameConfig::euromillions(),
            50,
            chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            &mut rng,
        );
        let hybrid = HybridStrategy::from_config(&config);
        let scores = hybrid.aggregate(&Context::new(&ds), &mut rng);
        let weight_sum: f64 = config.weights.entries().iter().map(|(_, w)| w).sum();
        let total: f64 = scores.iter().sum();
        assert!((total - weight_sum * 3.0).abs() < 1e-9, "total = {total}");
    }

    #[test]
    fn test_hybrid_zero_weights_except_frequency() {
        let mut config = fast_config();
        config.weights = StrategyWeights {
            frequency: 1.0,
            overdue: 0.0,
            pattern: 0.0,
            statistical: 0.0,
            delta: 0.0,
            markov: 0.0,
            genetic: 0.0,
            fourier: 0.0,
        };
        let game = GameConfig::new("t", 10, 3, None, vec![]).unwrap();
        let draws = vec![&[1u8, 2, 3][..]; 5];
        let ds = make_test_dataset(game, &draws);
        let p = HybridStrategy::from_config(&config).predict(&Context::new(&ds), &mut StdRng::seed_from_u64(0));
        assert_eq!(p.candidate.numbers(), &[1, 2, 3]);
        assert_eq!(p.fallback, None);
    }

    #[test]
    fn test_apply_weights() {
        let mut weights = StrategyWeights::default();
        let updates = HashMap::from([
            ("frequency".to_string(), 0.9),
            ("pattern".to_string(), 0.0),
            ("markov".to_string(), 5.0),
        ]);
        weights.apply(&updates).unwrap();
        assert_eq!(weights.frequency, 0.9);
        assert_eq!(weights.pattern, 0.0);
        // non réglable : ignoré
        assert_eq!(weights.markov, 0.2);
    }

    #[test]
    fn test_apply_invalid_weight_leaves_weights_unchanged() {
        let mut weights = StrategyWeights::default();
        let updates = HashMap::from([
            ("frequency".to_string(), 0.5),
            ("overdue".to_string(), -1.0),
        ]);
        let err = weights.apply(&updates).unwrap_err();
        assert!(matches!(err, EngineError::InvalidWeight { ref key, .. } if key == "overdue"));
        assert_eq!(weights, StrategyWeights::default());

        let updates = HashMap::from([("statistical".to_string(), f64::NAN)]);
        assert!(weights.apply(&updates).is_err());
    }
}
