use rand::RngCore;

use lotto_model::DrawDataset;

use crate::sampler::weighted_select;

use super::{Context, Prediction, Strategy, StrategyKind};

/// Chaîne de Markov d'ordre 1 sur les numéros : ce qui a suivi quoi.
pub struct MarkovStrategy;

impl MarkovStrategy {
    /// Matrice N×N : `m[a-1][b-1]` = P(b au tirage suivant | a au tirage courant).
    /// Les lignes sans transition observée restent nulles.
    pub fn transition_matrix(dataset: &DrawDataset) -> Vec<Vec<f64>> {
        let size = dataset.config().ball_count() as usize;
        let mut transition = vec![vec![0.0f64; size]; size];

        // draws[t] = plus récent que draws[t + 1]
        for pair in dataset.draws().windows(2) {
            let (next, current) = (&pair[0], &pair[1]);
            for &from in &current.numbers {
                for &to in &next.numbers {
                    transition[(from - 1) as usize][(to - 1) as usize] += 1.0;
                }
            }
        }

        for row in &mut transition {
            let total: f64 = row.iter().sum();
            if total > 0.0 {
                for p in row.iter_mut() {
                    *p /= total;
                }
            }
        }

        transition
    }

    pub fn scores(dataset: &DrawDataset) -> Vec<f64> {
        let size = dataset.config().ball_count() as usize;
        let Some(latest) = dataset.latest() else {
            return vec![0.0; size];
        };

        let transition = Self::transition_matrix(dataset);
        let mut scores = vec![0.0f64; size];
        for &from in &latest.numbers {
            for (s, p) in scores.iter_mut().zip(&transition[(from - 1) as usize]) {
                *s += p;
            }
        }
        scores
    }
}

impl Strategy for MarkovStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Markov
    }

    fn predict(&self, ctx: &Context<'_>, rng: &mut dyn RngCore) -> Prediction {
        let scores = Self::scores(ctx.dataset);
        let selection = weighted_select(&scores, ctx.pick_count(), rng);
        Prediction::from_selection(selection, scores)
    }
}
