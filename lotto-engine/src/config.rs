use serde::{Deserialize, Serialize};

use crate::ensemble::StrategyWeights;
use crate::error::{EngineError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticConfig {
    pub population_size: usize,
    pub generations: usize,
    /// Part de la population recopiée telle quelle à chaque génération
    pub elite_fraction: f64,
    /// Probabilité de mutation par gène
    pub mutation_rate: f64,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 50,
            elite_fraction: 0.2,
            mutation_rate: 0.1,
        }
    }
}

impl GeneticConfig {
    /// Taille de l'élite, au moins 1 pour garantir la monotonie du meilleur score.
    pub fn elite_count(&self) -> usize {
        ((self.population_size as f64 * self.elite_fraction).round() as usize)
            .clamp(1, self.population_size.max(1))
    }
}

/// Paramètres du moteur. Toutes les bornes d'itération sont ici.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub weights: StrategyWeights,
    pub genetic: GeneticConfig,
    pub monte_carlo_iterations: usize,
    pub equilibrium_attempts: usize,
    pub equilibrium_sum_tolerance: f64,
    pub constraint_attempts: usize,
    /// Clés de la roue = K + `wheel_key_size` numéros chauds
    pub wheel_key_size: usize,
    pub max_wheel_keys: usize,
    pub delta_top: usize,
    pub delta_max_seed: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: StrategyWeights::default(),
            genetic: GeneticConfig::default(),
            monte_carlo_iterations: 10_000,
            equilibrium_attempts: 1000,
            equilibrium_sum_tolerance: 30.0,
            constraint_attempts: 100,
            wheel_key_size: 3,
            max_wheel_keys: 20,
            delta_top: 10,
            delta_max_seed: 15,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| EngineError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;

        let g = &self.genetic;
        if g.population_size < 2 {
            return Err(EngineError::Config(format!(
                "genetic.population_size = {} (minimum 2)",
                g.population_size
            )));
        }
        if !(0.0..=1.0).contains(&g.elite_fraction) {
            return Err(EngineError::Config(format!(
                "genetic.elite_fraction = {} hors de [0, 1]",
                g.elite_fraction
            )));
        }
        if !(0.0..=1.0).contains(&g.mutation_rate) {
            return Err(EngineError::Config(format!(
                "genetic.mutation_rate = {} hors de [0, 1]",
                g.mutation_rate
            )));
        }

        let positive = [
            ("monte_carlo_iterations", self.monte_carlo_iterations),
            ("equilibrium_attempts", self.equilibrium_attempts),
            ("constraint_attempts", self.constraint_attempts),
            ("max_wheel_keys", self.max_wheel_keys),
            ("delta_top", self.delta_top),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(EngineError::Config(format!("{name} doit être > 0")));
            }
        }

        if !self.equilibrium_sum_tolerance.is_finite() || self.equilibrium_sum_tolerance < 0.0 {
            return Err(EngineError::Config(format!(
                "equilibrium_sum_tolerance = {} invalide",
                self.equilibrium_sum_tolerance
            )));
        }
        if self.delta_max_seed == 0 {
            return Err(EngineError::Config("delta_max_seed doit être >= 1".to_string()));
        }
        Ok(())
    }
}
