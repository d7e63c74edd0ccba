use std::collections::{BTreeSet, HashSet};

use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use lotto_model::{Candidate, DrawDataset, GameConfig, ScoredCandidate};

use crate::confidence::confidence;
use crate::error::Result;
use crate::strategies::{Context, Strategy};

/// Nombre de tirages récents pris en compte par `avoid_repeats`.
pub const RECENT_DRAWS: usize = 3;

/// Contraintes structurelles, appliquées au mieux (jamais garanties).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {
    pub balance_odd_even: bool,
    pub balance_high_low: bool,
    pub avoid_repeats: bool,
}

impl Constraints {
    pub fn all() -> Self {
        Self {
            balance_odd_even: true,
            balance_high_low: true,
            avoid_repeats: true,
        }
    }

    /// Nom de la première contrainte violée, `None` si la grille passe.
    pub fn violation(
        &self,
        candidate: &Candidate,
        config: &GameConfig,
        recent: &BTreeSet<u8>,
    ) -> Option<&'static str> {
        let k = config.pick_count();
        let balanced = |count: usize| count >= 2 && count + 2 <= k;

        if self.balance_odd_even && !balanced(candidate.odd_count()) {
            return Some("odd_even");
        }
        if self.balance_high_low && !balanced(candidate.low_count(config)) {
            return Some("high_low");
        }
        if self.avoid_repeats {
            let overlap = candidate.numbers().iter().filter(|n| recent.contains(n)).count();
            if overlap as f64 > k as f64 / 2.0 {
                return Some("repeats");
            }
        }
        None
    }
}

/// Union des numéros des derniers tirages.
pub fn recent_numbers(dataset: &DrawDataset) -> BTreeSet<u8> {
    dataset
        .recent(RECENT_DRAWS)
        .iter()
        .flat_map(|d| d.numbers.iter().copied())
        .collect()
}

/// Génère `count` grilles distinctes au mieux, triées par confiance décroissante.
///
/// Chaque grille dispose de `max_attempts` essais ; au-delà, le dernier essai est
/// accepté même s'il viole une contrainte ou duplique une grille du lot. Erreur de
/// validation si la stratégie produit une grille étrangère au jeu.
pub fn generate_sets(
    count: usize,
    strategy: &dyn Strategy,
    constraints: Constraints,
    dataset: &DrawDataset,
    max_attempts: usize,
    rng: &mut dyn RngCore,
) -> Result<Vec<ScoredCandidate>> {
    let ctx = Context::new(dataset);
    let config = dataset.config();
    let recent = recent_numbers(dataset);
    let max_attempts = max_attempts.max(1);

    let mut seen: HashSet<Candidate> = HashSet::new();
    let mut sets = Vec::with_capacity(count);
    let mut total_attempts = 0;
    let mut relaxed = 0;

    for index in 0..count {
        let mut accepted = None;
        let mut last = None;

        for attempt in 1..=max_attempts {
            total_attempts += 1;
            let candidate = strategy.predict(&ctx, rng).candidate;
            let reason = if seen.contains(&candidate) {
                Some("duplicate")
            } else {
                constraints.violation(&candidate, config, &recent)
            };

            match reason {
                None => {
                    accepted = Some(candidate);
                    break;
                }
                Some(reason) if attempt == max_attempts => {
                    debug!(
                        strategy = %strategy.kind(),
                        set = index,
                        attempts = max_attempts,
                        reason,
                        "essais épuisés, dernière grille acceptée"
                    );
                }
                Some(_) => {}
            }
            last = Some(candidate);
        }

        let Some(candidate) = accepted.or_else(|| {
            relaxed += 1;
            last
        }) else {
            continue;
        };

        seen.insert(candidate.clone());
        sets.push(ScoredCandidate {
            confidence: confidence(&candidate, dataset)?,
            candidate,
            strategy: strategy.kind().to_string(),
        });
    }

    sets.sort_by(|a, b| b.confidence.cmp(&a.confidence));

    info!(
        strategy = %strategy.kind(),
        count = sets.len(),
        attempts = total_attempts,
        relaxed,
        "grilles générées"
    );
    Ok(sets)
}
