use rand::RngCore;
use tracing::debug;

use lotto_model::Candidate;

use crate::sampler::uniform_select;

use super::frequency::FrequencyStrategy;
use super::{Context, Fallback, Prediction, Strategy, StrategyKind};

/// Échantillonnage par rejet : grilles uniformes jusqu'à en trouver une dont le
/// nombre d'impairs est à ±1 du profil dominant et la somme proche de la moyenne
/// historique. Sinon, repli sur la stratégie fréquence.
pub struct EquilibriumStrategy {
    attempts: usize,
    sum_tolerance: f64,
}

impl EquilibriumStrategy {
    pub fn new(attempts: usize, sum_tolerance: f64) -> Self {
        Self { attempts, sum_tolerance }
    }

    fn is_balanced(&self, candidate: &Candidate, dominant_odd: usize, mean_sum: f64) -> bool {
        candidate.odd_count().abs_diff(dominant_odd) <= 1
            && (candidate.sum() as f64 - mean_sum).abs() <= self.sum_tolerance
    }
}

impl Strategy for EquilibriumStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Statistical
    }

    fn predict(&self, ctx: &Context<'_>, rng: &mut dyn RngCore) -> Prediction {
        let dominant = ctx.analyzer.odd_even_distribution().dominant();
        let mean_sum = ctx.analyzer.sum_distribution().mean;

        if let Some(dominant_odd) = dominant {
            for _ in 0..self.attempts {
                let candidate =
                    Candidate::from_distinct(uniform_select(ctx.ball_count(), ctx.pick_count(), rng));
                if self.is_balanced(&candidate, dominant_odd, mean_sum) {
                    let scores = ctx
                        .config()
                        .numbers()
                        .map(|n| if candidate.contains(n) { 1.0 } else { 0.0 })
                        .collect();
                    return Prediction {
                        candidate,
                        scores,
                        fallback: None,
                    };
                }
            }
        }

        debug!(
            attempts = self.attempts,
            draws = ctx.dataset.len(),
            "aucune grille équilibrée trouvée, repli sur la fréquence"
        );
        let mut prediction = FrequencyStrategy.predict(ctx, rng);
        prediction.fallback = Some(Fallback::EquilibriumExhausted);
        prediction
    }
}
