use chrono::{Datelike, NaiveDate};
use rand::{Rng, RngCore};

use crate::error::{Result, ValidationError};
use crate::models::{Draw, GameConfig};

/// Historique des tirages d'un jeu. draws[0] = tirage le plus récent.
///
/// Les retards sont positionnels : « tirages depuis » = indice dans cette séquence,
/// jamais une distance calendaire.
#[derive(Debug, Clone)]
pub struct DrawDataset {
    config: GameConfig,
    draws: Vec<Draw>,
}

impl DrawDataset {
    /// Valide chaque tirage ; l'erreur indique l'indice du premier tirage invalide.
    pub fn new(config: GameConfig, draws: Vec<Draw>) -> Result<Self> {
        for (index, draw) in draws.iter().enumerate() {
            draw.validate(&config).map_err(|e| ValidationError::InvalidDraw {
                index,
                source: Box::new(e),
            })?;
        }
        Ok(Self { config, draws })
    }

    pub fn empty(config: GameConfig) -> Self {
        Self {
            config,
            draws: Vec::new(),
        }
    }

    /// Historique aléatoire uniforme de `count` tirages, datés à rebours sur les jours de
    /// tirage du jeu à partir de `last_date` (inclus).
    pub fn synthetic(config: GameConfig, count: usize, last_date: NaiveDate, rng: &mut dyn RngCore) -> Self {
        let n = config.ball_count() as usize;
        let k = config.pick_count();
        let mut date = last_date;
        let mut draws = Vec::with_capacity(count);

        for _ in 0..count {
            while !config.draw_days().is_empty() && !config.draw_days().contains(&date.weekday()) {
                match date.pred_opt() {
                    Some(d) => date = d,
                    None => break,
                }
            }

            let mut numbers: Vec<u8> = rand::seq::index::sample(rng, n, k)
                .into_iter()
                .map(|i| (i + 1) as u8)
                .collect();
            numbers.sort_unstable();
            let bonus = config.bonus_pool().map(|b| rng.random_range(1..=b));

            draws.push(Draw {
                date,
                numbers,
                bonus,
                jackpot: None,
            });
            date = date.pred_opt().unwrap_or(date);
        }

        Self { config, draws }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn latest(&self) -> Option<&Draw> {
        self.draws.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Draw> {
        self.draws.iter()
    }

    /// Les `n` derniers tirages (moins si l'historique est plus court).
    pub fn recent(&self, n: usize) -> &[Draw] {
        &self.draws[..n.min(self.draws.len())]
    }
}

impl<'a> IntoIterator for &'a DrawDataset {
    type Item = &'a Draw;
    type IntoIter = std::slice::Iter<'a, Draw>;

    fn into_iter(self) -> Self::IntoIter {
        self.draws.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_reports_bad_draw_index() {
        let config = GameConfig::new("t", 10, 3, None, vec![]).unwrap();
        let good = Draw::new(&config, date(2024, 1, 2), &[1, 2, 3], None, None).unwrap();
        let bad = Draw {
            date: date(2024, 1, 1),
            numbers: vec![1, 1, 2],
            bonus: None,
            jackpot: None,
        };
        let err = DrawDataset::new(config, vec![good, bad]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidDraw {
                index: 1,
                source: Box::new(ValidationError::Duplicate(1)),
            }
        );
    }

    #[test]
    fn test_empty_dataset() {
        let ds = DrawDataset::empty(GameConfig::lotto_649());
        assert!(ds.is_empty());
        assert!(ds.latest().is_none());
        assert!(ds.recent(3).is_empty());
    }

    #[test]
    fn test_synthetic_draws_are_valid() {
        let config = GameConfig::euromillions();
        let mut rng = StdRng::seed_from_u64(7);
        let ds = DrawDataset::synthetic(config.clone(), 60, date(2024, 6, 30), &mut rng);
        assert_eq!(ds.len(), 60);
        for draw in &ds {
            assert!(draw.validate(&config).is_ok(), "{:?}", draw);
            assert!(
                matches!(draw.date.weekday(), Weekday::Tue | Weekday::Fri),
                "{} n'est pas un jour de tirage",
                draw.date
            );
        }
    }

    #[test]
    fn test_synthetic_most_recent_first() {
        let mut rng = StdRng::seed_from_u64(1);
        let ds = DrawDataset::synthetic(GameConfig::lotto_649(), 20, date(2024, 3, 31), &mut rng);
        assert!(ds.draws().windows(2).all(|w| w[0].date > w[1].date));
        // 2024-03-31 est un dimanche : dernier tirage le samedi 30
        assert_eq!(ds.latest().unwrap().date, date(2024, 3, 30));
    }

    #[test]
    fn test_synthetic_seed_determinism() {
        let config = GameConfig::uk_lotto();
        let a = DrawDataset::synthetic(config.clone(), 10, date(2024, 1, 1), &mut StdRng::seed_from_u64(3));
        let b = DrawDataset::synthetic(config, 10, date(2024, 1, 1), &mut StdRng::seed_from_u64(3));
        assert_eq!(a.draws(), b.draws());
    }
}
