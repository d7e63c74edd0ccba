use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Description statique d'une variante de loterie : `pick_count` numéros tirés dans
/// `1..=ball_count`, plus un bonus optionnel tiré dans `1..=bonus_pool`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameConfig {
    name: String,
    ball_count: u8,
    pick_count: usize,
    bonus_pool: Option<u8>,
    draw_days: Vec<Weekday>,
}

impl GameConfig {
    pub fn new(
        name: impl Into<String>,
        ball_count: u8,
        pick_count: usize,
        bonus_pool: Option<u8>,
        draw_days: Vec<Weekday>,
    ) -> Result<Self> {
        if pick_count == 0 || pick_count >= ball_count as usize {
            return Err(ValidationError::PickCountOutOfRange {
                pick: pick_count,
                balls: ball_count,
            });
        }
        if bonus_pool == Some(0) {
            return Err(ValidationError::EmptyBonusPool);
        }
        Ok(Self {
            name: name.into(),
            ball_count,
            pick_count,
            bonus_pool,
            draw_days,
        })
    }

    pub fn lotto_649() -> Self {
        Self::preset("Lotto 6/49", 49, 6, Some(49), vec![Weekday::Wed, Weekday::Sat])
    }

    pub fn euromillions() -> Self {
        Self::preset("EuroMillions", 50, 5, Some(12), vec![Weekday::Tue, Weekday::Fri])
    }

    pub fn powerball() -> Self {
        Self::preset(
            "Powerball",
            69,
            5,
            Some(26),
            vec![Weekday::Mon, Weekday::Wed, Weekday::Sat],
        )
    }

    pub fn uk_lotto() -> Self {
        Self::preset("UK Lotto", 59, 6, Some(59), vec![Weekday::Wed, Weekday::Sat])
    }

    fn preset(name: &str, balls: u8, pick: usize, bonus: Option<u8>, days: Vec<Weekday>) -> Self {
        Self {
            name: name.to_string(),
            ball_count: balls,
            pick_count: pick,
            bonus_pool: bonus,
            draw_days: days,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// N : les numéros sont tirés dans `1..=ball_count`.
    pub fn ball_count(&self) -> u8 {
        self.ball_count
    }

    /// K : numéros distincts par tirage.
    pub fn pick_count(&self) -> usize {
        self.pick_count
    }

    pub fn bonus_pool(&self) -> Option<u8> {
        self.bonus_pool
    }

    pub fn draw_days(&self) -> &[Weekday] {
        &self.draw_days
    }

    /// Borne de la moitié basse : `n` est bas si `n <= N/2`.
    pub fn half(&self) -> f64 {
        self.ball_count as f64 / 2.0
    }

    pub fn numbers(&self) -> impl Iterator<Item = u8> {
        1..=self.ball_count
    }
}

/// Vérifie que `numbers` contient exactement K numéros distincts de `1..=N`.
pub fn validate_numbers(config: &GameConfig, numbers: &[u8]) -> Result<()> {
    if numbers.len() != config.pick_count {
        return Err(ValidationError::WrongCount {
            expected: config.pick_count,
            actual: numbers.len(),
        });
    }
    for &n in numbers {
        if n < 1 || n > config.ball_count {
            return Err(ValidationError::OutOfRange {
                number: n,
                max: config.ball_count,
            });
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                return Err(ValidationError::Duplicate(numbers[i]));
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draw {
    pub date: NaiveDate,
    /// Triés par ordre croissant
    pub numbers: Vec<u8>,
    pub bonus: Option<u8>,
    pub jackpot: Option<f64>,
}

impl Draw {
    pub fn new(
        config: &GameConfig,
        date: NaiveDate,
        numbers: &[u8],
        bonus: Option<u8>,
        jackpot: Option<f64>,
    ) -> Result<Self> {
        let draw = Self {
            date,
            numbers: sorted(numbers),
            bonus,
            jackpot,
        };
        draw.validate(config)?;
        Ok(draw)
    }

    pub fn validate(&self, config: &GameConfig) -> Result<()> {
        validate_numbers(config, &self.numbers)?;
        match (self.bonus, config.bonus_pool) {
            (Some(_), None) => Err(ValidationError::UnexpectedBonus),
            (Some(b), Some(max)) if b < 1 || b > max => {
                Err(ValidationError::BonusOutOfRange { bonus: b, max })
            }
            _ => Ok(()),
        }
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers.contains(&number)
    }
}

/// Grille : exactement K numéros distincts de `1..=N`, triés.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Candidate(Vec<u8>);

impl Candidate {
    pub fn new(config: &GameConfig, numbers: &[u8]) -> Result<Self> {
        validate_numbers(config, numbers)?;
        Ok(Self(sorted(numbers)))
    }

    /// Pour les numéros déjà garantis distincts et dans la plage (sortie d'un échantillonneur).
    pub fn from_distinct(mut numbers: Vec<u8>) -> Self {
        numbers.sort_unstable();
        debug_assert!(numbers.windows(2).all(|w| w[0] < w[1]), "duplicate in {numbers:?}");
        Self(numbers)
    }

    pub fn numbers(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, number: u8) -> bool {
        self.0.binary_search(&number).is_ok()
    }

    pub fn odd_count(&self) -> usize {
        self.0.iter().filter(|&&n| n % 2 == 1).count()
    }

    pub fn low_count(&self, config: &GameConfig) -> usize {
        let half = config.half();
        self.0.iter().filter(|&&n| n as f64 <= half).count()
    }

    /// Écart entre le plus grand et le plus petit numéro
    pub fn spread(&self) -> u8 {
        match (self.0.first(), self.0.last()) {
            (Some(&lo), Some(&hi)) => hi - lo,
            _ => 0,
        }
    }

    pub fn sum(&self) -> u32 {
        self.0.iter().map(|&n| n as u32).sum()
    }
}

impl std::fmt::Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|n| format!("{:2}", n)).collect();
        write!(f, "{}", parts.join(" - "))
    }
}

/// Grille notée (0-100) avec le nom de la stratégie qui l'a produite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub confidence: u8,
    pub strategy: String,
}

pub(crate) fn sorted(numbers: &[u8]) -> Vec<u8> {
    let mut v = numbers.to_vec();
    v.sort_unstable();
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_game() -> GameConfig {
        GameConfig::new("test", 10, 3, None, vec![]).unwrap()
    }

    #[test]
    fn test_game_config_rejects_pick_count() {
        assert_eq!(
            GameConfig::new("x", 10, 10, None, vec![]),
            Err(ValidationError::PickCountOutOfRange { pick: 10, balls: 10 })
        );
        assert!(GameConfig::new("x", 10, 0, None, vec![]).is_err());
        assert_eq!(
            GameConfig::new("x", 10, 3, Some(0), vec![]),
            Err(ValidationError::EmptyBonusPool)
        );
    }

    #[test]
    fn test_presets_are_valid() {
        for game in [
            GameConfig::lotto_649(),
            GameConfig::euromillions(),
            GameConfig::powerball(),
            GameConfig::uk_lotto(),
        ] {
            let rebuilt = GameConfig::new(
                game.name(),
                game.ball_count(),
                game.pick_count(),
                game.bonus_pool(),
                game.draw_days().to_vec(),
            );
            assert_eq!(rebuilt.as_ref(), Ok(&game));
        }
    }

    #[test]
    fn test_validate_numbers_ok() {
        assert!(validate_numbers(&small_game(), &[1, 5, 10]).is_ok());
    }

    #[test]
    fn test_validate_numbers_wrong_count() {
        assert_eq!(
            validate_numbers(&small_game(), &[1, 2]),
            Err(ValidationError::WrongCount { expected: 3, actual: 2 })
        );
    }

    #[test]
    fn test_validate_numbers_out_of_range() {
        assert_eq!(
            validate_numbers(&small_game(), &[0, 2, 3]),
            Err(ValidationError::OutOfRange { number: 0, max: 10 })
        );
        assert_eq!(
            validate_numbers(&small_game(), &[1, 2, 11]),
            Err(ValidationError::OutOfRange { number: 11, max: 10 })
        );
    }

    #[test]
    fn test_validate_numbers_duplicate() {
        assert_eq!(
            validate_numbers(&small_game(), &[4, 2, 4]),
            Err(ValidationError::Duplicate(4))
        );
    }

    #[test]
    fn test_draw_bonus_checks() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        let plain = small_game();
        assert_eq!(
            Draw::new(&plain, date, &[1, 2, 3], Some(1), None),
            Err(ValidationError::UnexpectedBonus)
        );

        let with_bonus = GameConfig::new("b", 10, 3, Some(4), vec![]).unwrap();
        assert_eq!(
            Draw::new(&with_bonus, date, &[1, 2, 3], Some(5), None),
            Err(ValidationError::BonusOutOfRange { bonus: 5, max: 4 })
        );
        // Le bonus peut coïncider avec un numéro principal
        assert!(Draw::new(&with_bonus, date, &[1, 2, 3], Some(3), None).is_ok());
    }

    #[test]
    fn test_draw_numbers_sorted() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        let draw = Draw::new(&small_game(), date, &[9, 1, 4], None, Some(1.5e6)).unwrap();
        assert_eq!(draw.numbers, vec![1, 4, 9]);
        assert!(draw.contains(4));
    }

    #[test]
    fn test_candidate_accessors() {
        let game = small_game();
        let c = Candidate::new(&game, &[7, 2, 5]).unwrap();
        assert_eq!(c.numbers(), &[2, 5, 7]);
        assert_eq!(c.odd_count(), 2);
        assert_eq!(c.low_count(&game), 2);
        assert_eq!(c.spread(), 5);
        assert_eq!(c.sum(), 14);
        assert!(c.contains(5));
        assert!(!c.contains(6));
        assert_eq!(c.to_string(), " 2 -  5 -  7");
    }

    #[test]
    fn test_candidate_serializes_as_list() {
        let c = Candidate::new(&small_game(), &[3, 1, 2]).unwrap();
        assert_eq!(serde_json::to_string(&c).unwrap(), "[1,2,3]");
    }
}
