//! CLI interface for tradesim
//!
//! Provides subcommands for:
//! - `run`: Replay the configured backtest
//! - `config`: Show the effective configuration

mod run;

pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tradesim")]
#[command(about = "Replays historical candles through a trading strategy to measure realized profit")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "tradesim.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay the configured backtest
    Run(RunArgs),
    /// Show the effective configuration
    Config,
}
