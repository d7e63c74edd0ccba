use rand::RngCore;
use tracing::debug;

use lotto_model::Candidate;

use super::{Context, Prediction, Strategy, StrategyKind};

/// Système réducteur : énumère tous les sous-ensembles de K numéros parmi les
/// numéros chauds et garde celui de fréquence cumulée maximale (premier trouvé
/// à égalité).
pub struct WheelingStrategy {
    /// Numéros ajoutés à K pour former la clé
    extra_keys: usize,
    max_keys: usize,
}

impl WheelingStrategy {
    pub fn new(extra_keys: usize, max_keys: usize) -> Self {
        Self { extra_keys, max_keys }
    }

    /// Taille de clé effective, bornée à `[K, min(N, max_keys)]`.
    pub fn key_size(&self, ctx: &Context<'_>) -> usize {
        let k = ctx.pick_count();
        let upper = (ctx.ball_count() as usize).min(self.max_keys).max(k);
        (k + self.extra_keys).clamp(k, upper)
    }
}

impl Strategy for WheelingStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Wheeling
    }

    fn predict(&self, ctx: &Context<'_>, _rng: &mut dyn RngCore) -> Prediction {
        let k = ctx.pick_count();
        let requested = k + self.extra_keys;
        let size = self.key_size(ctx);
        if size < requested {
            debug!(requested, size, "clé de roue tronquée");
        }

        let freq = ctx.analyzer.frequency();
        let keys: Vec<u8> = ctx.analyzer.hot(size).into_iter().map(|(n, _)| n).collect();

        let mut best: Option<(Vec<u8>, u32)> = None;
        for subset in Combinations::new(keys.len(), k) {
            let total: u32 = subset.iter().map(|&i| freq.get(keys[i])).sum();
            if best.as_ref().map_or(true, |(_, b)| total > *b) {
                best = Some((subset.iter().map(|&i| keys[i]).collect(), total));
            }
        }

        let numbers = best.map(|(numbers, _)| numbers).unwrap_or_else(|| keys.clone());
        let scores = freq.as_slice().iter().map(|&c| c as f64).collect();
        Prediction {
            candidate: Candidate::from_distinct(numbers),
            scores,
            fallback: None,
        }
    }
}

/// Combinaisons d'indices `0..n` de taille `k`, en ordre lexicographique.
pub struct Combinations {
    indices: Vec<usize>,
    n: usize,
    done: bool,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            indices: (0..k).collect(),
            n,
            done: k > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        let current = self.indices.clone();

        let k = self.indices.len();
        let mut i = k;
        loop {
            if i == 0 {
                self.done = true;
                break;
            }
            i -= 1;
            if self.indices[i] < self.n - k + i {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                break;
            }
        }

        Some(current)
    }
}
