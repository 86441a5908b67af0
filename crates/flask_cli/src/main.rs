//! Flask CLI
//!
//! Headless runner for the physics demonstrations:
//! - `flask steps` lists the buoyancy story
//! - `flask buoyancy` animates through the steps on a virtual clock
//! - `flask evaporate` runs the particle scheduler
//! - `flask config` prints the effective configuration

mod headless;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flask_scenes::buoyancy::STEPS;
use flask_scenes::SceneConfig;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "flask")]
#[command(about = "Headless runner for the flask physics demonstrations")]
#[command(version)]
struct Args {
    /// Config file (flask.toml); built-in defaults are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the buoyancy steps
    Steps,

    /// Animate the buoyancy steps
    Buoyancy {
        /// Display refresh rate (1 to 1000)
        #[arg(long, default_value_t = 60)]
        fps: u32,

        /// Use auto-play instead of pressing "next"
        #[arg(long)]
        autoplay: bool,

        /// Number of "next" presses without auto-play
        #[arg(long, default_value_t = 3)]
        steps: usize,
    },

    /// Run the evaporation particle scheduler
    Evaporate {
        /// Simulated run time
        #[arg(long, default_value_t = 20_000)]
        duration_ms: u64,

        /// Random seed for particle placement and paths
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Display refresh rate used to poll timers and paint (1 to 1000)
        #[arg(long, default_value_t = 60)]
        fps: u32,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Steps => {
            for step in &STEPS {
                println!("{}. {}", step.index, step.title);
                println!("   {}", step.description);
            }
        }
        Command::Buoyancy {
            fps,
            autoplay,
            steps,
        } => {
            info!(fps, autoplay, "running buoyancy");
            let report = headless::run_buoyancy(&config, fps, autoplay, steps)?;
            print_report(&report)?;
        }
        Command::Evaporate {
            duration_ms,
            seed,
            fps,
        } => {
            info!(duration_ms, seed, "running evaporation");
            let report = headless::run_evaporation(&config, duration_ms, seed, fps)?;
            print_report(&report)?;
        }
        Command::Config => {
            print!("{}", config.to_toml_string()?);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SceneConfig> {
    match path {
        Some(path) => {
            let config = SceneConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            info!("Loaded config from {}", path.display());
            Ok(config)
        }
        None => Ok(SceneConfig::default()),
    }
}

fn print_report(report: &impl serde::Serialize) -> Result<()> {
    let text = toml::to_string_pretty(report).context("Failed to format report")?;
    print!("{text}");
    Ok(())
}
