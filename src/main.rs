//! Risk MC - Entry Point
//!
//! Collects run parameters from flags (and optionally a TOML config file),
//! runs one of the estimators and prints a summary. With `--output` the full
//! result is written as JSON for a plotting front end.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use risk_mc::core::config::{load_config, SimulationConfig};
use risk_mc::core::error::Result;
use risk_mc::core::types::ForceState;
use risk_mc::simulation::sweep::{DEFAULT_DELTAS, DEFAULT_MAX_DEFENDERS};
use risk_mc::simulation::{
    sweep_defense_with, sweep_delta_with, AttackReport, DefenseReport, DeltaReport, Simulator,
};

/// Monte Carlo odds for dice-attrition battles
#[derive(Parser, Debug)]
#[command(name = "risk-mc")]
#[command(about = "Estimate attack win probabilities by repeated dice battles")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// TOML file with runs, die, seed, parallel_threshold, deadline_ms
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Monte Carlo trials per estimate (overrides the config file)
    #[arg(long, global = true)]
    runs: Option<u32>,

    /// Random seed for deterministic runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Die faces, comma separated
    #[arg(long, global = true, value_delimiter = ',')]
    die: Option<Vec<u32>>,

    /// Stop scheduling sweep steps after this many milliseconds
    #[arg(long, global = true)]
    deadline_ms: Option<u64>,

    /// Write the full result as JSON to this file
    #[arg(long, short = 'o', global = true)]
    output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Win probabilities and outcome histogram for one attack
    Attack {
        #[arg(long, short = 'a', default_value_t = 10)]
        attackers: u32,
        #[arg(long, short = 'd', default_value_t = 10)]
        defenders: u32,
    },
    /// Defender win probability as the defense grows, and the best extra unit
    Defense {
        #[arg(long, short = 'a', default_value_t = 10)]
        attackers: u32,
        #[arg(long, short = 'd', default_value_t = 10)]
        defenders: u32,
        /// Largest defender count (default: max(2 * attackers, defenders + 5))
        #[arg(long)]
        max_defenders: Option<u32>,
    },
    /// Attacker win curves for fixed attacker-minus-defender gaps
    Delta {
        /// Gaps to sweep, comma separated
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        deltas: Option<Vec<i32>>,
        #[arg(long, default_value_t = DEFAULT_MAX_DEFENDERS)]
        max_defenders: u32,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli.common)?;

    let (summary, json) = match cli.command {
        Command::Attack {
            attackers,
            defenders,
        } => {
            let initial = ForceState::new(attackers, defenders);
            tracing::info!("Initial conditions: {}", initial);
            tracing::info!("Run simulation...");

            let distribution = Simulator::from_config(&config)?.simulate(initial, true)?;
            let report = AttackReport::new(initial, &distribution);
            (report.summary(), report.to_json()?)
        }
        Command::Defense {
            attackers,
            defenders,
            max_defenders,
        } => {
            let initial = ForceState::new(attackers, defenders);
            let max_defenders = max_defenders
                .unwrap_or_else(|| attackers.saturating_mul(2).max(defenders.saturating_add(5)));
            tracing::info!("Run simulation to estimate the defender position from {}...", initial);

            let records = sweep_defense_with(&config, defenders, attackers, max_defenders)?;
            let report = DefenseReport::new(initial, records);
            (report.summary(), report.to_json()?)
        }
        Command::Delta {
            deltas,
            max_defenders,
        } => {
            let deltas = deltas.unwrap_or_else(|| DEFAULT_DELTAS.to_vec());
            tracing::info!("Running attacker delta simulation. Hold on...");

            let curves = sweep_delta_with(&config, &deltas, max_defenders)?;
            let report = DeltaReport::new(config.runs, max_defenders, curves);
            (report.summary(), report.to_json()?)
        }
    };

    println!("{}", summary);

    if let Some(path) = &cli.common.output {
        std::fs::write(path, json)?;
        tracing::info!("Full output written to {}", path.display());
    }

    Ok(())
}

/// Defaults, then the config file, then command-line overrides
fn build_config(args: &CommonArgs) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SimulationConfig::default(),
    };

    if let Some(runs) = args.runs {
        config.runs = runs;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(die) = &args.die {
        config.die = die.clone();
    }
    if let Some(deadline_ms) = args.deadline_ms {
        config.deadline_ms = Some(deadline_ms);
    }

    config.validate()?;
    Ok(config)
}
