use chrono::Datelike;
use rand::distr::weighted::WeightedIndex;
use rand::prelude::Distribution;
use rand::{Rng, RngCore};
use tracing::debug;

/// Graine du jour au format AAAAMMJJ : reproductible dans la journée.
pub fn date_seed() -> u64 {
    let today = chrono::Local::now().date_naive();
    today.year() as u64 * 10_000 + today.month() as u64 * 100 + today.day() as u64
}

/// Résultat d'un tirage pondéré sans remise.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Dans l'ordre de sélection
    pub numbers: Vec<u8>,
    /// Vrai si le poids restant est tombé à zéro et que les numéros restants ont été
    /// tirés uniformément.
    pub fallback: bool,
}

/// Tire `count` numéros distincts, `weights[i]` étant le poids du numéro `i + 1`.
///
/// À chaque étape le numéro est choisi proportionnellement au poids restant (somme
/// cumulée contre un uniforme). Poids négatifs ou non finis = 0. Si le poids restant
/// est nul avant d'avoir `count` numéros, tous les numéros non choisis reçoivent le
/// poids 1 : la sélection termine toujours avec `min(count, weights.len())` numéros.
pub fn weighted_select(weights: &[f64], count: usize, rng: &mut dyn RngCore) -> Selection {
    let mut available: Vec<(u8, f64)> = weights
        .iter()
        .enumerate()
        .map(|(i, &w)| ((i + 1) as u8, if w.is_finite() && w > 0.0 { w } else { 0.0 }))
        .collect();
    let mut numbers = Vec::with_capacity(count);
    let mut fallback = false;

    while numbers.len() < count && !available.is_empty() {
        let total: f64 = available.iter().map(|(_, w)| *w).sum();
        if total <= 0.0 {
            if !fallback {
                debug!(
                    selected = numbers.len(),
                    remaining = count - numbers.len(),
                    "poids restant nul, repli uniforme"
                );
            }
            fallback = true;
            for (_, w) in &mut available {
                *w = 1.0;
            }
        }

        // Somme infinie : on ramène les poids à `[0, 1]`
        let scale = if total.is_finite() {
            1.0
        } else {
            available.iter().map(|(_, w)| *w).fold(0.0, f64::max)
        };
        let idx = match WeightedIndex::<f64>::new(available.iter().map(|(_, w)| *w / scale)) {
            Ok(dist) => dist.sample(rng),
            Err(e) => {
                debug!(error = %e, "distribution pondérée invalide, repli sur les poids positifs");
                let positive: Vec<usize> = (0..available.len()).filter(|&i| available[i].1 > 0.0).collect();
                positive[rng.random_range(0..positive.len())]
            }
        };
        let (number, _) = available.remove(idx);
        numbers.push(number);
    }

    Selection { numbers, fallback }
}

/// Tire `count` numéros distincts uniformément dans `1..=pool`.
pub fn uniform_select(pool: u8, count: usize, rng: &mut dyn RngCore) -> Vec<u8> {
    let amount = count.min(pool as usize);
    rand::seq::index::sample(rng, pool as usize, amount)
        .into_iter()
        .map(|i| (i + 1) as u8)
        .collect()
}
