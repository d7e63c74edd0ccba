mod display;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lotto_engine::sampler::date_seed;
use lotto_engine::{Constraints, Engine, EngineConfig, StrategyKind};
use lotto_model::{DrawDataset, GameConfig};

use crate::display::{
    display_confidence, display_prediction, display_sets, display_stats, display_weights,
};

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum Game {
    #[default]
    #[clap(name = "lotto649")]
    Lotto649,
    Euromillions,
    Powerball,
    #[clap(name = "uk")]
    UkLotto,
}

impl Game {
    fn config(self) -> GameConfig {
        match self {
            Game::Lotto649 => GameConfig::lotto_649(),
            Game::Euromillions => GameConfig::euromillions(),
            Game::Powerball => GameConfig::powerball(),
            Game::UkLotto => GameConfig::uk_lotto(),
        }
    }
}

#[derive(Parser)]
#[command(name = "lotto", about = "Analyse statistique et génération de grilles de loterie")]
struct Cli {
    /// Jeu analysé
    #[arg(short, long, global = true, default_value = "lotto649")]
    game: Game,

    /// Nombre de tirages de l'historique généré
    #[arg(short, long, global = true, default_value = "200")]
    draws: usize,

    /// Seed pour la reproductibilité (défaut : date du jour AAAAMMJJ)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Fichier JSON de configuration du moteur
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Afficher les statistiques de l'historique
    Stats {
        /// Sortie JSON brute
        #[arg(long)]
        json: bool,
    },

    /// Prédire une grille avec une stratégie
    Predict {
        #[arg(short, long, default_value = "hybrid")]
        strategy: StrategyKind,

        /// Poids hybrides pour cette prédiction seulement, clé=valeur
        #[arg(long = "weight", value_parser = parse_weight)]
        weight: Vec<(String, f64)>,
    },

    /// Générer plusieurs grilles sous contraintes, triées par confiance
    Sets {
        /// Nombre de grilles
        #[arg(short, long, default_value = "5")]
        count: usize,

        #[arg(short, long, default_value = "hybrid")]
        strategy: StrategyKind,

        /// Entre 2 et K-2 numéros impairs
        #[arg(long)]
        balance_odd_even: bool,

        /// Entre 2 et K-2 numéros dans la moitié basse
        #[arg(long)]
        balance_high_low: bool,

        /// Au plus K/2 numéros des 3 derniers tirages
        #[arg(long)]
        avoid_repeats: bool,
    },

    /// Noter une grille (0-100)
    Confidence {
        /// Numéros de la grille
        #[arg(required = true, num_args = 1..)]
        numbers: Vec<u8>,
    },

    /// Afficher ou modifier les poids du mode hybride
    Weights {
        /// Poids sous la forme clé=valeur (frequency, overdue, pattern, statistical)
        #[arg(long = "set", value_parser = parse_weight)]
        set: Vec<(String, f64)>,

        /// Écrire la configuration résultante dans ce fichier
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

fn parse_weight(s: &str) -> Result<(String, f64)> {
    let Some((key, value)) = s.split_once('=') else {
        bail!("Format attendu clé=valeur, reçu '{s}'");
    };
    let value: f64 = value
        .trim()
        .parse()
        .with_context(|| format!("Poids invalide pour '{key}'"))?;
    Ok((key.trim().to_string(), value))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    EngineConfig::from_json_str(&json)
        .with_context(|| format!("Configuration invalide dans {}", path.display()))
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let mut engine = Engine::new(config).context("Configuration du moteur invalide")?;

    let seed = cli.seed.unwrap_or_else(date_seed);
    let mut rng = StdRng::seed_from_u64(seed);
    let game = cli.game.config();
    let last_date = chrono::Local::now().date_naive();
    let dataset = DrawDataset::synthetic(game, cli.draws, last_date, &mut rng);
    info!(game = dataset.config().name(), draws = dataset.len(), seed, "historique généré");

    match cli.command {
        Command::Stats { json } => cmd_stats(&engine, &dataset, json),
        Command::Predict { strategy, weight } => cmd_predict(&engine, &dataset, strategy, weight, &mut rng),
        Command::Sets {
            count,
            strategy,
            balance_odd_even,
            balance_high_low,
            avoid_repeats,
        } => {
            if count == 0 {
                bail!("Le nombre de grilles doit être > 0");
            }
            let constraints = Constraints {
                balance_odd_even,
                balance_high_low,
                avoid_repeats,
            };
            let sets = engine.generate_sets(count, strategy, constraints, &dataset, &mut rng)?;
            display_sets(&sets, seed);
            Ok(())
        }
        Command::Confidence { numbers } => {
            let candidate = lotto_model::Candidate::new(dataset.config(), &numbers)
                .context("Grille invalide")?;
            let breakdown = engine.confidence_breakdown(&candidate, &dataset)?;
            display_confidence(&candidate, &breakdown);
            Ok(())
        }
        Command::Weights { set, save } => cmd_weights(&mut engine, set, save.as_deref()),
    }
}

fn cmd_stats(engine: &Engine, dataset: &DrawDataset, json: bool) -> Result<()> {
    let stats = engine.analyze(dataset);
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        display_stats(dataset.config(), &stats);
    }
    Ok(())
}

fn cmd_predict(
    engine: &Engine,
    dataset: &DrawDataset,
    strategy: StrategyKind,
    weight: Vec<(String, f64)>,
    rng: &mut StdRng,
) -> Result<()> {
    let weights = if weight.is_empty() {
        None
    } else {
        let mut weights = engine.config().weights.clone();
        weights.apply(&weight.into_iter().collect())?;
        Some(weights)
    };
    let prediction = engine.predict(strategy, dataset, weights.as_ref(), rng)?;
    let confidence = engine.confidence_breakdown(&prediction.candidate, dataset)?;
    display_prediction(strategy, &prediction, &confidence);
    Ok(())
}

fn cmd_weights(engine: &mut Engine, set: Vec<(String, f64)>, save: Option<&Path>) -> Result<()> {
    if !set.is_empty() {
        let updates: HashMap<String, f64> = set.into_iter().collect();
        engine.set_strategy_weights(&updates)?;
    }
    display_weights(&engine.config().weights);

    if let Some(path) = save {
        let json = engine.config().to_json_string()?;
        std::fs::write(path, json).with_context(|| format!("Impossible d'écrire {}", path.display()))?;
        println!("Configuration enregistrée dans {}", path.display());
    }
    Ok(())
}
