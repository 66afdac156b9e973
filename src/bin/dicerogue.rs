//! Command-line battle simulator.
//!
//! Plays battles with the built-in autoplay strategy and prints one line per
//! hand, or one JSON object per hand with `--json`.
//!
//! ```text
//! dicerogue --seed 42 --battles 3
//! dicerogue --config battle.toml --json
//! RUST_LOG=dice_rogue=debug dicerogue --hands 2
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dice_rogue::battle::{autoplay, Battle, HandResult};
use dice_rogue::core::{BattleConfig, GameRng};

#[derive(Parser, Debug)]
#[command(name = "dicerogue", version, about = "Simulate dice-rogue battles")]
struct Cli {
    /// Battle config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed; overrides the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Hands per cycle; overrides the config file
    #[arg(long)]
    hands: Option<u32>,

    /// Number of battles to play
    #[arg(long, default_value_t = 1)]
    battles: u32,

    /// Print JSON lines instead of text
    #[arg(long)]
    json: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Serialize)]
struct HandRecord<'a> {
    battle: u32,
    hand: usize,
    #[serde(flatten)]
    result: &'a HandResult,
}

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<BattleConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => BattleConfig::load(path)?,
        None => BattleConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(hands) = cli.hands {
        config = config.with_max_hands(hands);
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli, out: &mut dyn Write) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(cli)?;
    let mut rng = GameRng::new(config.seed_or_default());
    info!(seed = rng.seed(), battles = cli.battles, "starting simulation");

    let mut total: u64 = 0;
    for battle_no in 1..=cli.battles {
        let battle_config = config.clone().with_seed(rng.fork().seed());
        let mut battle = Battle::new(battle_config);
        let results = autoplay::play_cycle(&mut battle)?;

        let battle_score: u64 = results.iter().map(|r| u64::from(r.score())).sum();
        total += battle_score;

        for (i, result) in results.iter().enumerate() {
            if cli.json {
                let record = HandRecord {
                    battle: battle_no,
                    hand: i + 1,
                    result,
                };
                writeln!(out, "{}", serde_json::to_string(&record)?)?;
            } else {
                writeln!(out, "battle {} hand {}: {}", battle_no, i + 1, result.evaluation.summary())?;
            }
        }
        if !cli.json {
            writeln!(out, "battle {} total: {}", battle_no, battle_score)?;
        }
    }

    if !cli.json && cli.battles > 1 {
        writeln!(out, "all battles: {}", total)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match run(&cli, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "simulation failed");
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}
