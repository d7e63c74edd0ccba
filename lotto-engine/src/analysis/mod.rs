pub mod distribution;

use serde::Serialize;

use lotto_model::{DrawDataset, GameConfig};

pub use distribution::{
    DecadeBin, DeltaDistribution, OddEvenDistribution, PatternCounts, SumDistribution,
};

/// Taille des listes (chauds, froids, retards, paires) dans `Statistics`.
pub const REPORT_SIZE: usize = 10;

/// Nombre d'apparitions par numéro, indexé par `numéro - 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FrequencyTable(Vec<u32>);

impl FrequencyTable {
    pub fn get(&self, number: u8) -> u32 {
        number
            .checked_sub(1)
            .and_then(|i| self.0.get(i as usize))
            .copied()
            .unwrap_or(0)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.0.iter().enumerate().map(|(i, &c)| ((i + 1) as u8, c))
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn max(&self) -> u32 {
        self.0.iter().copied().max().unwrap_or(0)
    }
}

/// Co-occurrences de chaque paire de numéros dans un même tirage (matrice symétrique N×N).
#[derive(Debug, Clone)]
pub struct PairTable {
    size: usize,
    counts: Vec<u32>,
}

impl PairTable {
    pub fn get(&self, a: u8, b: u8) -> u32 {
        if a == b || a == 0 || b == 0 || a as usize > self.size || b as usize > self.size {
            return 0;
        }
        self.counts[(a as usize - 1) * self.size + (b as usize - 1)]
    }

    /// Somme des co-occurrences de `number` avec chacun de `others`.
    pub fn affinity(&self, number: u8, others: &[u8]) -> u32 {
        others.iter().map(|&o| self.get(number, o)).sum()
    }
}

/// Ensemble des statistiques d'un historique.
#[derive(Debug, Clone, Serialize)]
pub struct Statistics {
    pub draw_count: usize,
    pub expected_frequency: f64,
    pub frequency: FrequencyTable,
    pub hot: Vec<(u8, u32)>,
    pub cold: Vec<(u8, u32)>,
    pub overdue: Vec<(u8, usize)>,
    pub common_pairs: Vec<((u8, u8), u32)>,
    pub odd_even: OddEvenDistribution,
    pub sums: SumDistribution,
    pub decades: Vec<DecadeBin>,
    pub deltas: DeltaDistribution,
    pub patterns: PatternCounts,
}

/// Statistiques par numéro dérivées d'un historique. Rien n'est mis en cache :
/// chaque appel recalcule à partir des tirages. Un historique vide donne des
/// statistiques nulles, jamais une erreur.
#[derive(Debug, Clone, Copy)]
pub struct Analyzer<'a> {
    dataset: &'a DrawDataset,
}

impl<'a> Analyzer<'a> {
    pub fn new(dataset: &'a DrawDataset) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &'a DrawDataset {
        self.dataset
    }

    pub fn config(&self) -> &'a GameConfig {
        self.dataset.config()
    }

    fn size(&self) -> usize {
        self.config().ball_count() as usize
    }

    pub fn frequency(&self) -> FrequencyTable {
        let mut counts = vec![0u32; self.size()];
        for draw in self.dataset {
            for &n in &draw.numbers {
                counts[(n - 1) as usize] += 1;
            }
        }
        FrequencyTable(counts)
    }

    /// Fréquence de chaque numéro sous un tirage parfaitement uniforme : len·K/N.
    pub fn expected_frequency(&self) -> f64 {
        let config = self.config();
        self.dataset.len() as f64 * config.pick_count() as f64 / config.ball_count() as f64
    }

    /// Les `n` numéros les plus fréquents ; à égalité, le plus petit numéro d'abord.
    pub fn hot(&self, n: usize) -> Vec<(u8, u32)> {
        let mut ranked: Vec<(u8, u32)> = self.frequency().iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }

    /// Les `n` numéros les moins fréquents ; à égalité, le plus petit numéro d'abord.
    pub fn cold(&self, n: usize) -> Vec<(u8, u32)> {
        let mut ranked: Vec<(u8, u32)> = self.frequency().iter().collect();
        ranked.sort_by(|a, b| a.1.cmp(&b.1));
        ranked.truncate(n);
        ranked
    }

    /// Pour chaque numéro, l'indice de sa dernière apparition (0 = dernier tirage),
    /// ou `len` s'il n'est jamais sorti.
    pub fn draws_since_seen(&self) -> Vec<usize> {
        let len = self.dataset.len();
        let mut gaps = vec![len; self.size()];
        for (t, draw) in self.dataset.iter().enumerate() {
            for &n in &draw.numbers {
                let idx = (n - 1) as usize;
                if gaps[idx] == len {
                    gaps[idx] = t;
                }
            }
        }
        gaps
    }

    /// Les `n` numéros les plus en retard, triés par retard décroissant.
    pub fn overdue(&self, n: usize) -> Vec<(u8, usize)> {
        let mut ranked: Vec<(u8, usize)> = self
            .draws_since_seen()
            .into_iter()
            .enumerate()
            .map(|(i, gap)| ((i + 1) as u8, gap))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }

    /// Indices (croissants) des tirages contenant `number`.
    pub fn appearances(&self, number: u8) -> Vec<usize> {
        self.dataset
            .iter()
            .enumerate()
            .filter(|(_, d)| d.contains(number))
            .map(|(t, _)| t)
            .collect()
    }

    /// Écart moyen entre apparitions successives de chaque numéro ;
    /// `None` pour les numéros apparus moins de deux fois.
    pub fn number_gaps(&self) -> Vec<Option<f64>> {
        let mut positions: Vec<Vec<usize>> = vec![Vec::new(); self.size()];
        for (t, draw) in self.dataset.iter().enumerate() {
            for &n in &draw.numbers {
                positions[(n - 1) as usize].push(t);
            }
        }
        positions
            .iter()
            .map(|pos| {
                if pos.len() < 2 {
                    return None;
                }
                let total: usize = pos.windows(2).map(|w| w[1] - w[0]).sum();
                Some(total as f64 / (pos.len() - 1) as f64)
            })
            .collect()
    }

    pub fn pair_counts(&self) -> PairTable {
        let size = self.size();
        let mut counts = vec![0u32; size * size];
        for draw in self.dataset {
            for (i, &a) in draw.numbers.iter().enumerate() {
                for &b in &draw.numbers[i + 1..] {
                    let (a, b) = ((a - 1) as usize, (b - 1) as usize);
                    counts[a * size + b] += 1;
                    counts[b * size + a] += 1;
                }
            }
        }
        PairTable { size, counts }
    }

    /// Les `n` paires observées les plus fréquentes, `(a, b)` avec `a < b`.
    /// À égalité, l'ordre lexicographique des paires est conservé.
    pub fn common_pairs(&self, n: usize) -> Vec<((u8, u8), u32)> {
        let table = self.pair_counts();
        let max = self.size();
        let mut pairs = Vec::new();
        for a in 1..=max {
            for b in (a + 1)..=max {
                let (a, b) = (a as u8, b as u8);
                let count = table.get(a, b);
                if count > 0 {
                    pairs.push(((a, b), count));
                }
            }
        }
        pairs.sort_by(|x, y| y.1.cmp(&x.1));
        pairs.truncate(n);
        pairs
    }

    pub fn statistics(&self) -> Statistics {
        Statistics {
            draw_count: self.dataset.len(),
            expected_frequency: self.expected_frequency(),
            frequency: self.frequency(),
            hot: self.hot(REPORT_SIZE),
            cold: self.cold(REPORT_SIZE),
            overdue: self.overdue(REPORT_SIZE),
            common_pairs: self.common_pairs(REPORT_SIZE),
            odd_even: self.odd_even_distribution(),
            sums: self.sum_distribution(),
            decades: self.decade_distribution(),
            deltas: self.delta_analysis(),
            patterns: self.pattern_analysis(),
        }
    }
}
