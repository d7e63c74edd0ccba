use serde::Serialize;

use lotto_model::{validate_numbers, Candidate, DrawDataset};

use crate::analysis::Analyzer;
use crate::error::Result;

/// Plafond de chaque composante.
pub const COMPONENT_MAX: f64 = 20.0;
/// Plafond du ratio fréquence moyenne / fréquence attendue.
pub const FREQUENCY_RATIO_CAP: f64 = 1.5;
/// Nombre de paires fréquentes consultées pour le bonus de paires.
pub const TOP_PAIRS: usize = 20;

/// Les cinq composantes de l'indice de confiance, chacune dans `[0, 20]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ConfidenceBreakdown {
    pub frequency: f64,
    pub balance: f64,
    pub spread: f64,
    pub decades: f64,
    pub pairs: f64,
}

impl ConfidenceBreakdown {
    /// Échoue si la grille ne respecte pas la configuration du jeu de `dataset`.
    pub fn compute(candidate: &Candidate, dataset: &DrawDataset) -> Result<Self> {
        validate_numbers(dataset.config(), candidate.numbers())?;
        let analyzer = Analyzer::new(dataset);
        let config = dataset.config();
        let k = candidate.len() as f64;
        let n = config.ball_count() as f64;

        let frequency = {
            let expected = analyzer.expected_frequency();
            if expected > 0.0 && k > 0.0 {
                let freq = analyzer.frequency();
                let mean = candidate.numbers().iter().map(|&x| freq.get(x) as f64).sum::<f64>() / k;
                ((mean / expected).min(FREQUENCY_RATIO_CAP) * COMPONENT_MAX).min(COMPONENT_MAX)
            } else {
                0.0
            }
        };

        let balance = if k > 0.0 {
            let half = k / 2.0;
            (1.0 - (candidate.odd_count() as f64 - half).abs() / half) * COMPONENT_MAX
        } else {
            0.0
        };

        let spread = (candidate.spread() as f64 / (0.8 * n)).min(1.0) * COMPONENT_MAX;

        let decades = {
            let mut covered: Vec<u8> = candidate.numbers().iter().map(|&x| (x - 1) / 10).collect();
            covered.dedup();
            covered.len() as f64 / (config.ball_count() as usize).div_ceil(10) as f64 * COMPONENT_MAX
        };

        let pairs = {
            let matched = analyzer
                .common_pairs(TOP_PAIRS)
                .iter()
                .filter(|((a, b), _)| candidate.contains(*a) && candidate.contains(*b))
                .count();
            (2.0 * matched as f64).min(COMPONENT_MAX)
        };

        Ok(Self {
            frequency,
            balance,
            spread,
            decades,
            pairs,
        })
    }

    pub fn raw_total(&self) -> f64 {
        self.frequency + self.balance + self.spread + self.decades + self.pairs
    }

    /// Somme arrondie, bornée à `[0, 100]`.
    pub fn total(&self) -> u8 {
        self.raw_total().round().clamp(0.0, 100.0) as u8
    }
}

pub fn confidence(candidate: &Candidate, dataset: &DrawDataset) -> Result<u8> {
    Ok(ConfidenceBreakdown::compute(candidate, dataset)?.total())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::strategies::make_test_dataset;
    use lotto_model::{GameConfig, ValidationError};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_confidence_five_identical_draws() {
        let game = GameConfig::new("mini", 10, 3, None, vec![]).unwrap();
        let draws = vec![&[1u8, 2, 3][..]; 5];
        let ds = make_test_dataset(game.clone(), &draws);
        let c = Candidate::new(&game, &[1, 2, 3]).unwrap();
        let b = ConfidenceBreakdown::compute(&c, &ds).unwrap();
        assert!((b.frequency - 20.0).abs() < 1e-10, "fréquence = {}", b.frequency);
        assert!((b.balance - 40.0 / 3.0).abs() < 1e-10, "équilibre = {}", b.balance);
        assert!((b.spread - 5.0).abs() < 1e-10, "écart = {}", b.spread);
        assert!((b.decades - 20.0).abs() < 1e-10);
        assert!((b.pairs - 6.0).abs() < 1e-10);
        assert_eq!(b.total(), 64);
        assert_eq!(confidence(&c, &ds).unwrap(), 64);
    }

    #[test]
    fn test_confidence_favours_frequent_numbers() {
        let game = GameConfig::new("t", 20, 4, None, vec![]).unwrap();
        let mut draws: Vec<&[u8]> = vec![&[2, 7, 12, 19]; 10];
        draws.extend([&[1u8, 8, 14, 20][..], &[9, 10, 11, 13][..]]);
        let ds = make_test_dataset(game.clone(), &draws);

        let hot: Vec<u8> = Analyzer::new(&ds).hot(4).into_iter().map(|(n, _)| n).collect();
        let hot = Candidate::new(&game, &hot).unwrap();
        assert_eq!(hot.numbers(), &[2, 7, 12, 19]);
        let cold = Candidate::new(&game, &[3, 4, 5, 6]).unwrap();

        let (h, c) = (confidence(&hot, &ds).unwrap(), confidence(&cold, &ds).unwrap());
        assert!(h >= c, "chauds {h} < froids {c}");
        assert_eq!(h, 92);
    }

    #[test]
    fn test_confidence_empty_dataset_has_no_frequency_component() {
        let ds = DrawDataset::empty(GameConfig::lotto_649());
        let c = Candidate::new(ds.config(), &[1, 12, 23, 34, 45, 46]).unwrap();
        let b = ConfidenceBreakdown::compute(&c, &ds).unwrap();
        assert_eq!(b.frequency, 0.0);
        assert_eq!(b.pairs, 0.0);
        assert!(b.total() <= 100);
    }

    #[test]
    fn test_confidence_always_in_range() {
        let mut rng = StdRng::seed_from_u64(33);
        for game in [GameConfig::lotto_649(), GameConfig::powerball(), GameConfig::uk_lotto()] {
            let ds = DrawDataset::synthetic(
                game.clone(),
                30,
                chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                &mut rng,
            );
            for draw in ds.iter() {
                let c = Candidate::new(&game, &draw.numbers).unwrap();
                let b = ConfidenceBreakdown::compute(&c, &ds).unwrap();
                for part in [b.frequency, b.balance, b.spread, b.decades, b.pairs] {
                    assert!((0.0..=COMPONENT_MAX).contains(&part), "{:?}", b);
                }
                assert!(b.total() <= 100);
            }
        }
    }

    #[test]
    fn test_frequency_component_full_at_expected_ratio() {
        // Cinq tirages disjoints : chaque numéro sort une fois, attendu = 1
        let game = GameConfig::new("t", 10, 2, None, vec![]).unwrap();
        let ds = make_test_dataset(game.clone(), &[&[1, 2], &[3, 4], &[5, 6], &[7, 8], &[9, 10]]);
        let c = Candidate::new(&game, &[1, 10]).unwrap();
        let b = ConfidenceBreakdown::compute(&c, &ds).unwrap();
        assert!((b.frequency - COMPONENT_MAX).abs() < 1e-10, "fréquence = {}", b.frequency);
    }

    #[test]
    fn test_frequency_component_below_expected() {
        // 1 sort deux fois, 4 jamais : ratio moyen 1 / 1.6
        let game = GameConfig::new("t", 5, 2, None, vec![]).unwrap();
        let ds = make_test_dataset(game.clone(), &[&[1, 2], &[1, 3], &[2, 5], &[3, 5]]);
        let c = Candidate::new(&game, &[1, 4]).unwrap();
        let b = ConfidenceBreakdown::compute(&c, &ds).unwrap();
        assert!((b.frequency - 12.5).abs() < 1e-10, "fréquence = {}", b.frequency);
    }

    #[test]
    fn test_confidence_rejects_candidate_from_another_game() {
        let game = GameConfig::new("mini", 10, 3, None, vec![]).unwrap();
        let draws = vec![&[1u8, 2, 3][..]; 5];
        let ds = make_test_dataset(game, &draws);

        let foreign = Candidate::new(&GameConfig::euromillions(), &[1, 12, 23, 34, 45]).unwrap();
        assert!(matches!(
            ConfidenceBreakdown::compute(&foreign, &ds),
            Err(EngineError::Validation(ValidationError::WrongCount { expected: 3, actual: 5 }))
        ));

        let zero = Candidate::from_distinct(vec![0, 1, 2]);
        assert!(matches!(
            confidence(&zero, &ds),
            Err(EngineError::Validation(ValidationError::OutOfRange { number: 0, max: 10 }))
        ));
    }
}
