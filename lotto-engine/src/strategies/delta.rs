use rand::{Rng, RngCore};
use tracing::debug;

use lotto_model::Candidate;

use crate::sampler::uniform_select;

use super::{Context, Fallback, Prediction, Strategy, StrategyKind};

/// Essais de pas par numéro manquant avant de compléter au hasard.
const ATTEMPTS_PER_NUMBER: usize = 10;

/// Marche par écarts : part d'un numéro de départ aléatoire et avance par l'un
/// des écarts les plus fréquents de l'historique.
pub struct DeltaStrategy {
    top: usize,
    max_seed: u8,
}

impl DeltaStrategy {
    pub fn new(top: usize, max_seed: u8) -> Self {
        Self { top, max_seed }
    }
}

impl Strategy for DeltaStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Delta
    }

    fn predict(&self, ctx: &Context<'_>, rng: &mut dyn RngCore) -> Prediction {
        let k = ctx.pick_count();
        let n = ctx.ball_count();
        let deltas = ctx.analyzer.delta_analysis().top(self.top);

        let seed = rng.random_range(1..=self.max_seed.clamp(1, n));
        let mut numbers = vec![seed];
        let mut current = seed;

        if !deltas.is_empty() {
            let mut attempts = 0;
            while numbers.len() < k && attempts < k * ATTEMPTS_PER_NUMBER {
                attempts += 1;
                let step = deltas[rng.random_range(0..deltas.len())];
                match current.checked_add(step) {
                    Some(next) if next <= n && !numbers.contains(&next) => {
                        numbers.push(next);
                        current = next;
                    }
                    _ => {}
                }
            }
        }

        let mut fallback = None;
        let missing = k - numbers.len();
        if missing > 0 {
            debug!(missing, deltas = deltas.len(), "marche par écarts incomplète, complément uniforme");
            let pool: Vec<u8> = ctx.config().numbers().filter(|x| !numbers.contains(x)).collect();
            for i in uniform_select(pool.len() as u8, missing, rng) {
                numbers.push(pool[(i - 1) as usize]);
            }
            fallback = Some(Fallback::DeltaFill { filled: missing });
        }

        let candidate = Candidate::from_distinct(numbers);
        let scores = ctx
            .config()
            .numbers()
            .map(|x| if candidate.contains(x) { 1.0 } else { 0.0 })
            .collect();
        Prediction {
            candidate,
            scores,
            fallback,
        }
    }
}
