use rand::{Rng, RngCore};

use lotto_model::Candidate;

use crate::analysis::{FrequencyTable, PairTable};
use crate::config::GeneticConfig;
use crate::sampler::uniform_select;

use super::{Context, Prediction, Strategy, StrategyKind};

const FREQUENCY_WEIGHT: f64 = 0.5;
const PAIR_WEIGHT: f64 = 0.3;
const BALANCE_BONUS: f64 = 10.0;
const SPREAD_BONUS: f64 = 5.0;

pub struct GeneticStrategy {
    config: GeneticConfig,
}

/// Résultat d'une évolution complète.
#[derive(Debug, Clone)]
pub struct Evolution {
    pub best: Candidate,
    pub best_fitness: f64,
    /// Meilleure fitness de la population initiale puis de chaque génération
    pub history: Vec<f64>,
    /// Part de la population finale contenant chaque numéro
    pub presence: Vec<f64>,
}

struct Fitness {
    freq: FrequencyTable,
    pairs: PairTable,
    pick: f64,
    balls: f64,
}

impl Fitness {
    fn new(ctx: &Context<'_>) -> Self {
        Self {
            freq: ctx.analyzer.frequency(),
            pairs: ctx.analyzer.pair_counts(),
            pick: ctx.pick_count() as f64,
            balls: ctx.ball_count() as f64,
        }
    }

    /// `numbers` trié
    fn score(&self, numbers: &[u8]) -> f64 {
        let freq_sum: u32 = numbers.iter().map(|&n| self.freq.get(n)).sum();

        let mut pair_sum = 0u32;
        for (i, &a) in numbers.iter().enumerate() {
            for &b in &numbers[i + 1..] {
                pair_sum += self.pairs.get(a, b);
            }
        }

        let odd = numbers.iter().filter(|&&n| n % 2 == 1).count() as f64;
        let even = numbers.len() as f64 - odd;
        let spread = match (numbers.first(), numbers.last()) {
            (Some(&lo), Some(&hi)) => (hi - lo) as f64,
            _ => 0.0,
        };

        FREQUENCY_WEIGHT * freq_sum as f64
            + PAIR_WEIGHT * pair_sum as f64
            + BALANCE_BONUS * (1.0 - (odd - even).abs() / self.pick)
            + SPREAD_BONUS * spread / self.balls
    }
}

impl GeneticStrategy {
    pub fn new(config: GeneticConfig) -> Self {
        Self { config }
    }

    pub fn evolve(&self, ctx: &Context<'_>, rng: &mut dyn RngCore) -> Evolution {
        let fitness = Fitness::new(ctx);
        let k = ctx.pick_count();
        let n = ctx.ball_count();
        let size = self.config.population_size.max(1);
        let elite_count = self.config.elite_count().min(size);

        let mut population: Vec<(Vec<u8>, f64)> = (0..size)
            .map(|_| {
                let mut genes = uniform_select(n, k, rng);
                genes.sort_unstable();
                let f = fitness.score(&genes);
                (genes, f)
            })
            .collect();
        rank(&mut population);

        let mut history = Vec::with_capacity(self.config.generations + 1);
        history.push(population[0].1);

        for _ in 0..self.config.generations {
            let mut next: Vec<(Vec<u8>, f64)> = population[..elite_count].to_vec();
            while next.len() < size {
                let p1 = &population[rng.random_range(0..elite_count)].0;
                let p2 = &population[rng.random_range(0..elite_count)].0;
                let mut child = crossover(p1, p2, n, rng);
                self.mutate(&mut child, n, rng);
                child.sort_unstable();
                let f = fitness.score(&child);
                next.push((child, f));
            }
            population = next;
            rank(&mut population);
            history.push(population[0].1);
        }

        let mut presence = vec![0.0f64; n as usize];
        for (genes, _) in &population {
            for &g in genes {
                presence[(g - 1) as usize] += 1.0 / size as f64;
            }
        }

        let (best, best_fitness) = population.swap_remove(0);
        Evolution {
            best: Candidate::from_distinct(best),
            best_fitness,
            history,
            presence,
        }
    }

    /// Chaque gène est remplacé, avec la probabilité configurée, par un numéro absent.
    fn mutate(&self, genes: &mut [u8], n: u8, rng: &mut dyn RngCore) {
        for i in 0..genes.len() {
            if rng.random::<f64>() < self.config.mutation_rate {
                let unused: Vec<u8> = (1..=n).filter(|x| !genes.contains(x)).collect();
                if !unused.is_empty() {
                    genes[i] = unused[rng.random_range(0..unused.len())];
                }
            }
        }
    }
}

/// Tri par fitness décroissante, stable.
fn rank(population: &mut [(Vec<u8>, f64)]) {
    population.sort_by(|a, b| b.1.total_cmp(&a.1));
}

/// Préfixe de `p1` jusqu'au point de coupe, suite de `p2` sans doublon,
/// complément uniforme si nécessaire.
fn crossover(p1: &[u8], p2: &[u8], n: u8, rng: &mut dyn RngCore) -> Vec<u8> {
    let k = p1.len();
    let cut = if k > 1 { rng.random_range(1..k) } else { k };
    let mut child: Vec<u8> = p1[..cut].to_vec();

    for &g in p2 {
        if child.len() >= k {
            break;
        }
        if !child.contains(&g) {
            child.push(g);
        }
    }

    while child.len() < k {
        let g = rng.random_range(1..=n);
        if !child.contains(&g) {
            child.push(g);
        }
    }
    child
}

impl Strategy for GeneticStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Genetic
    }

    fn predict(&self, ctx: &Context<'_>, rng: &mut dyn RngCore) -> Prediction {
        let evolution = self.evolve(ctx, rng);
        Prediction {
            candidate: evolution.best,
            scores: evolution.presence,
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

    fn small_config() -> GeneticConfig {
        GeneticConfig {
            population_size: 30,
            generations: 15,
            ..GeneticConfig::default()
        }
    }

    #[test]
    fn test_genetic_best_fitness_non_decreasing() {
        let mut rng = StdRng::seed_from_u64(5);
        let ds = DrawDataset::synthetic(
            GameConfig::lotto_649(),
            80,
            chrono::NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            &mut rng,
        );
        let evolution = GeneticStrategy::new(small_config()).evolve(&Context::new(&ds), &mut rng);
        assert_eq!(evolution.history.len(), 16);
        for (g, w) in evolution.history.windows(2).enumerate() {
            assert!(w[1] >= w[0], "génération {}: {} < {}", g + 1, w[1], w[0]);
        }
        assert_eq!(evolution.history.last().copied(), Some(evolution.best_fitness));
    }

    #[test]
    fn test_fitness_components() {
        let game = GameConfig::new("t", 10, 4, None, vec![]).unwrap();
        let ds = make_test_dataset(game, &[&[1, 2, 3, 4], &[1, 2, 9, 10]]);
        let fitness = Fitness::new(&Context::new(&ds));
        // fréq 2+2+1+1 = 6 ; paires (1,2)=2 (1,3)=1 (1,4)=1 (2,3)=1 (2,4)=1 (3,4)=1 -> 7
        // 2 impairs / 2 pairs -> bonus 10 ; écart 3/10 -> 1.5
        let expected = 0.5 * 6.0 + 0.3 * 7.0 + 10.0 + 5.0 * 3.0 / 10.0;
        assert!((fitness.score(&[1, 2, 3, 4]) - expected).abs() < 1e-10);
    }

    #[test]
    fn test_crossover_yields_distinct_genes() {
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..100 {
            let child = crossover(&[1, 2, 3, 4, 5], &[1, 2, 3, 4, 5], 50, &mut rng);
            let mut sorted = child.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted, vec![1, 2, 3, 4, 5]);
        }
        let child = crossover(&[1, 2, 3], &[3, 7, 9], 10, &mut rng);
        assert_eq!(child.len(), 3);
        assert_eq!(child[0], 1);
    }

    #[test]
    fn test_mutation_keeps_genes_distinct() {
        let strategy = GeneticStrategy::new(GeneticConfig {
            mutation_rate: 1.0,
            ..GeneticConfig::default()
        });
        let mut rng = StdRng::seed_from_u64(2);
        let mut genes = vec![1, 2, 3, 4, 5, 6];
        strategy.mutate(&mut genes, 8, &mut rng);
        let mut sorted = genes.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 6, "{:?}", genes);
    }
}
