use rand::RngCore;

use lotto_model::Candidate;

use super::{Context, Prediction, Strategy, StrategyKind};

/// Poids des co-occurrences face à la fréquence brute.
const PAIR_WEIGHT: f64 = 2.0;

/// Construction gloutonne et déterministe : part du numéro le plus fréquent puis
/// ajoute à chaque étape le numéro maximisant `fréquence + 2·Σ paires` avec la
/// sélection courante. À égalité, le premier numéro rencontré (le plus petit) gagne.
pub struct PatternStrategy;

impl Strategy for PatternStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Pattern
    }

    fn predict(&self, ctx: &Context<'_>, _rng: &mut dyn RngCore) -> Prediction {
        let freq = ctx.analyzer.frequency();
        let pairs = ctx.analyzer.pair_counts();
        let score =
            |n: u8, selected: &[u8]| freq.get(n) as f64 + PAIR_WEIGHT * pairs.affinity(n, selected) as f64;

        let mut selected: Vec<u8> = ctx.analyzer.hot(1).into_iter().map(|(n, _)| n).collect();

        while selected.len() < ctx.pick_count() {
            let mut best: Option<(u8, f64)> = None;
            for n in ctx.config().numbers() {
                if selected.contains(&n) {
                    continue;
                }
                let s = score(n, &selected);
                if best.map_or(true, |(_, b)| s > b) {
                    best = Some((n, s));
                }
            }
            match best {
                Some((n, _)) => selected.push(n),
                None => break,
            }
        }

        let scores = ctx.config().numbers().map(|n| score(n, &selected)).collect();
        Prediction {
            candidate: Candidate::from_distinct(selected),
            scores,
            fallback: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::make_test_dataset;
    use lotto_model::{DrawDataset, GameConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn game() -> GameConfig {
        GameConfig::new("t", 10, 3, None, vec![]).unwrap()
    }

    #[test]
    fn test_pattern_follows_pairs() {
        // 5 est le plus fréquent ; 9 ne sort qu'avec 5, 1 sort sans lui
        let ds = make_test_dataset(
            game(),
            &[&[5, 9, 10], &[5, 9, 2], &[1, 5, 3], &[1, 4, 6], &[1, 7, 8], &[5, 6, 7]],
        );
        let p = PatternStrategy.predict(&Context::new(&ds), &mut StdRng::seed_from_u64(0));
        // après 5 : 9 -> 2 + 2·2 = 6, 1 -> 3 + 2·1 = 5, 7 -> 2 + 2·1 = 4
        assert!(p.candidate.contains(5));
        assert!(p.candidate.contains(9));
        assert_eq!(p.fallback, None);
    }

    #[test]
    fn test_pattern_is_deterministic() {
        let ds = make_test_dataset(game(), &[&[1, 2, 3], &[2, 3, 4], &[7, 8, 9]]);
        let ctx = Context::new(&ds);
        let a = PatternStrategy.predict(&ctx, &mut StdRng::seed_from_u64(1));
        let b = PatternStrategy.predict(&ctx, &mut StdRng::seed_from_u64(99));
        assert_eq!(a.candidate, b.candidate);
        assert_eq!(a.candidate.numbers(), &[1, 2, 3]);
    }

    #[test]
    fn test_pattern_ties_pick_smallest_number() {
        let ds = DrawDataset::empty(game());
        let p = PatternStrategy.predict(&Context::new(&ds), &mut StdRng::seed_from_u64(0));
        assert_eq!(p.candidate.numbers(), &[1, 2, 3]);
    }
}
