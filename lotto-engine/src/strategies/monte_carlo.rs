use std::collections::HashMap;

use rand::RngCore;

use lotto_model::Candidate;

use crate::sampler::weighted_select;

use super::frequency::FrequencyStrategy;
use super::{Context, Fallback, Prediction, Strategy, StrategyKind};

/// Simule des tirages selon les fréquences observées et retient la combinaison
/// exacte la plus souvent produite. À égalité, la première à atteindre le
/// maximum est gardée.
pub struct MonteCarloStrategy {
    iterations: usize,
}

impl MonteCarloStrategy {
    pub fn new(iterations: usize) -> Self {
        Self { iterations }
    }
}

impl Strategy for MonteCarloStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::MonteCarlo
    }

    fn predict(&self, ctx: &Context<'_>, rng: &mut dyn RngCore) -> Prediction {
        let weights = FrequencyStrategy::scores(ctx);
        let k = ctx.pick_count();

        let mut counts: HashMap<Vec<u8>, u32> = HashMap::new();
        let mut best: Option<(Vec<u8>, u32)> = None;
        let mut fallback = false;

        for _ in 0..self.iterations.max(1) {
            let selection = weighted_select(&weights, k, rng);
            fallback |= selection.fallback;
            let mut key = selection.numbers;
            key.sort_unstable();

            let count = counts.entry(key.clone()).or_insert(0);
            *count += 1;
            if best.as_ref().map_or(true, |(_, b)| *count > *b) {
                best = Some((key, *count));
            }
        }

        let numbers = best.map(|(numbers, _)| numbers).unwrap_or_default();
        Prediction {
            candidate: Candidate::from_distinct(numbers),
            scores: weights,
            fallback: fallback.then_some(Fallback::UniformWeights),
        }
    }
}
