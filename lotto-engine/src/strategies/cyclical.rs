use rand::RngCore;

use crate::sampler::weighted_select;

use super::{Context, Prediction, Strategy, StrategyKind};

/// Cycles d'apparition : un numéro dont le retard approche ou dépasse son
/// intervalle moyen est favorisé, pondéré par sa fréquence.
pub struct CyclicalStrategy;

impl CyclicalStrategy {
    pub fn scores(ctx: &Context<'_>) -> Vec<f64> {
        let freq = ctx.analyzer.frequency();
        let since_seen = ctx.analyzer.draws_since_seen();

        ctx.analyzer
            .number_gaps()
            .into_iter()
            .zip(since_seen)
            .zip(freq.as_slice())
            .map(|((mean_gap, since), &count)| match mean_gap {
                Some(gap) if gap > 0.0 => since as f64 / gap * count as f64,
                _ => count as f64,
            })
            .collect()
    }
}

impl Strategy for CyclicalStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Fourier
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

    #[test]
    fn test_cyclical_scores() {
        let game = GameConfig::new("t", 10, 2, None, vec![]).unwrap();
        let ds = make_test_dataset(
            game,
            &[&[9, 10], &[7, 8], &[1, 2], &[5, 6], &[1, 3]],
        );
        let scores = CyclicalStrategy::scores(&Context::new(&ds));
        // 1 : indices 2 et 4 -> écart moyen 2, retard 2, fréquence 2 -> 2
        assert!((scores[0] - 2.0).abs() < 1e-10);
        // 2 : une seule apparition -> fréquence brute
        assert_eq!(scores[1], 1.0);
        // 4 : jamais sorti
        assert_eq!(scores[3], 0.0);
    }

    #[test]
    fn test_cyclical_favours_due_numbers() {
        // 1 et 2 sortent tous les 2 tirages et sont dus ; 3 et 4 viennent de sortir
        let game = GameConfig::new("t", 6, 2, None, vec![]).unwrap();
        let ds = make_test_dataset(
            game,
            &[&[3, 4], &[5, 6], &[1, 2], &[3, 4], &[1, 2], &[3, 4], &[1, 2]],
        );
        let scores = CyclicalStrategy::scores(&Context::new(&ds));
        assert!(scores[0] > scores[2], "{:?}", scores);
        assert_eq!(scores[2], 0.0);
    }
}
