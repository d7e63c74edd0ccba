use std::collections::BTreeMap;

use serde::Serialize;

use super::Analyzer;

/// Largeur des classes de l'histogramme des sommes.
pub const SUM_BIN_WIDTH: u32 = 20;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OddEvenDistribution {
    /// Nombre de tirages par nombre de numéros impairs
    pub counts: BTreeMap<usize, u32>,
}

impl OddEvenDistribution {
    /// Nombre d'impairs le plus fréquent (le plus petit à égalité).
    pub fn dominant(&self) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (&odd, &count) in &self.counts {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((odd, count));
            }
        }
        best.map(|(odd, _)| odd)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SumDistribution {
    pub min: u32,
    pub max: u32,
    pub mean: f64,
    /// Début de classe -> nombre de tirages
    pub bins: BTreeMap<u32, u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecadeBin {
    pub start: u8,
    pub end: u8,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeltaDistribution {
    /// Écart entre numéros consécutifs d'un tirage trié -> occurrences
    pub counts: BTreeMap<u8, u32>,
}

impl DeltaDistribution {
    /// Les `n` écarts les plus fréquents ; à égalité, le plus petit d'abord.
    pub fn top(&self, n: usize) -> Vec<u8> {
        let mut ranked: Vec<(u8, u32)> = self.counts.iter().map(|(&d, &c)| (d, c)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.into_iter().take(n).map(|(d, _)| d).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatternCounts {
    pub all_odd: u32,
    pub all_even: u32,
    /// Impairs à ±1 de K/2
    pub balanced: u32,
    /// Au moins K-1 numéros <= N/2
    pub mostly_low: u32,
    /// Au plus 1 numéro <= N/2
    pub mostly_high: u32,
    pub consecutive: u32,
    /// Écart max-min >= 0.7·N
    pub wide_spread: u32,
}

// ════════════════════════════════════════════════════════════════
// Distributions par tirage
// ════════════════════════════════════════════════════════════════

impl Analyzer<'_> {
    pub fn odd_even_distribution(&self) -> OddEvenDistribution {
        let mut counts = BTreeMap::new();
        for draw in self.dataset {
            let odd = draw.numbers.iter().filter(|&&n| n % 2 == 1).count();
            *counts.entry(odd).or_insert(0) += 1;
        }
        OddEvenDistribution { counts }
    }

    pub fn sum_distribution(&self) -> SumDistribution {
        if self.dataset.is_empty() {
            return SumDistribution::default();
        }

        let sums: Vec<u32> = self
            .dataset
            .iter()
            .map(|d| d.numbers.iter().map(|&n| n as u32).sum())
            .collect();

        let mut bins = BTreeMap::new();
        for &s in &sums {
            *bins.entry(s / SUM_BIN_WIDTH * SUM_BIN_WIDTH).or_insert(0) += 1;
        }

        SumDistribution {
            min: sums.iter().copied().min().unwrap_or(0),
            max: sums.iter().copied().max().unwrap_or(0),
            mean: sums.iter().map(|&s| s as f64).sum::<f64>() / sums.len() as f64,
            bins,
        }
    }

    /// Classes 1-10, 11-20, ... ; la dernière s'arrête à N.
    pub fn decade_distribution(&self) -> Vec<DecadeBin> {
        let max = self.config().ball_count() as usize;
        let mut bins: Vec<DecadeBin> = (0..max.div_ceil(10))
            .map(|d| DecadeBin {
                start: (d * 10 + 1) as u8,
                end: ((d + 1) * 10).min(max) as u8,
                count: 0,
            })
            .collect();
        for draw in self.dataset {
            for &n in &draw.numbers {
                bins[(n as usize - 1) / 10].count += 1;
            }
        }
        bins
    }

    pub fn delta_analysis(&self) -> DeltaDistribution {
        let mut counts = BTreeMap::new();
        for draw in self.dataset {
            for w in draw.numbers.windows(2) {
                *counts.entry(w[1] - w[0]).or_insert(0) += 1;
            }
        }
        DeltaDistribution { counts }
    }

    pub fn pattern_analysis(&self) -> PatternCounts {
        let config = self.config();
        let k = config.pick_count();
        let half = config.half();
        let wide = 0.7 * config.ball_count() as f64;
        let mut patterns = PatternCounts::default();

        for draw in self.dataset {
            let odd = draw.numbers.iter().filter(|&&n| n % 2 == 1).count();
            let low = draw.numbers.iter().filter(|&&n| n as f64 <= half).count();
            let spread = match (draw.numbers.first(), draw.numbers.last()) {
                (Some(&lo), Some(&hi)) => (hi - lo) as f64,
                _ => 0.0,
            };

            if odd == k {
                patterns.all_odd += 1;
            }
            if odd == 0 {
                patterns.all_even += 1;
            }
            if (odd as f64 - k as f64 / 2.0).abs() <= 1.0 {
                patterns.balanced += 1;
            }
            if low + 1 >= k {
                patterns.mostly_low += 1;
            }
            if low <= 1 {
                patterns.mostly_high += 1;
            }
            if draw.numbers.windows(2).any(|w| w[1] - w[0] == 1) {
                patterns.consecutive += 1;
            }
            if spread >= wide {
                patterns.wide_spread += 1;
            }
        }

        patterns
    }
}
