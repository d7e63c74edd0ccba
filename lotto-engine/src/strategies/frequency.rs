use rand::RngCore;

use crate::sampler::weighted_select;

use super::{Context, Prediction, Strategy, StrategyKind};

/// Poids proportionnel à la fréquence d'apparition.
pub struct FrequencyStrategy;

impl FrequencyStrategy {
    pub fn scores(ctx: &Context<'_>) -> Vec<f64> {
        let freq = ctx.analyzer.frequency();
        let total = freq.total() as f64;
        if total == 0.0 {
            return vec![0.0; ctx.ball_count() as usize];
        }
        freq.as_slice().iter().map(|&c| c as f64 / total).collect()
    }
}

impl Strategy for FrequencyStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Frequency
    }

    fn predict(&self, ctx: &Context<'_>, rng: &mut dyn RngCore) -> Prediction {
        let scores = Self::scores(ctx);
        let selection = weighted_select(&scores, ctx.pick_count(), rng);
        Prediction::from_selection(selection, scores)
    }
}
