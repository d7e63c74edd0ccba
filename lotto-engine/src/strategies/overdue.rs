use rand::RngCore;

use crate::sampler::weighted_select;

use super::{Context, Prediction, Strategy, StrategyKind};

/// Plafond du ratio retard / intervalle attendu.
pub const OVERDUE_CAP: f64 = 3.0;

/// Poids = retard rapporté à l'intervalle attendu N/K, plafonné.
pub struct OverdueStrategy;

impl OverdueStrategy {
    pub fn scores(ctx: &Context<'_>) -> Vec<f64> {
        let expected_gap = ctx.ball_count() as f64 / ctx.pick_count() as f64;
        ctx.analyzer
            .draws_since_seen()
            .into_iter()
            .map(|gap| (gap as f64 / expected_gap).min(OVERDUE_CAP))
            .collect()
    }
}

impl Strategy for OverdueStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Overdue
    }

    fn predict(&self, ctx: &Context<'_>, rng: &mut dyn RngCore) -> Prediction {
        let scores = Self::scores(ctx);
        let selection = weighted_select(&scores, ctx.pick_count(), rng);
        Prediction::from_selection(selection, scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::make_test_dataset;
    use lotto_model::GameConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_overdue_scores_capped() {
        // N/K = 5 ; 40 tirages sans le numéro 10 -> 8, plafonné à 3
        let game = GameConfig::new("t", 10, 2, None, vec![]).unwrap();
        let draws = vec![&[1u8, 2][..]; 40];
        let ds = make_test_dataset(game, &draws);
        let scores = OverdueStrategy::scores(&Context::new(&ds));
        assert_eq!(scores[0], 0.0);
        assert_eq!(scores[1], 0.0);
        assert_eq!(scores[9], OVERDUE_CAP);
    }

    #[test]
    fn test_overdue_gap_ratio() {
        let game = GameConfig::new("t", 10, 2, None, vec![]).unwrap();
        let ds = make_test_dataset(game, &[&[1, 2], &[3, 4], &[5, 6]]);
        let scores = OverdueStrategy::scores(&Context::new(&ds));
        // 3 vu à l'indice 1, 5 à l'indice 2, 7 jamais vu (= len = 3)
        assert!((scores[2] - 0.2).abs() < 1e-10);
        assert!((scores[4] - 0.4).abs() < 1e-10);
        assert!((scores[6] - 0.6).abs() < 1e-10);
    }

    #[test]
    fn test_overdue_avoids_recent_numbers() {
        let game = GameConfig::new("t", 10, 2, None, vec![]).unwrap();
        let draws = vec![&[1u8, 2][..]; 10];
        let ds = make_test_dataset(game, &draws);
        for seed in 0..20 {
            let p = OverdueStrategy.predict(&Context::new(&ds), &mut StdRng::seed_from_u64(seed));
            assert!(!p.candidate.contains(1) && !p.candidate.contains(2), "{:?}", p.candidate);
            assert_eq!(p.fallback, None);
        }
    }
}
