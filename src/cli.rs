//! Command-line interface for Battler
//!
//! Supports graphical (default), console, headless and metrics modes.

use clap::Parser;
use std::path::PathBuf;

/// Turn-based creature battler
#[derive(Parser, Debug)]
#[command(name = "battler")]
#[command(about = "Turn-based creature battler")]
#[command(version)]
pub struct Args {
    /// Run in headless mode with the specified JSON config file
    #[arg(long, value_name = "CONFIG_FILE", conflicts_with_all = ["console", "metrics"])]
    pub headless: Option<PathBuf>,

    /// Output path for the batch report (headless mode only)
    #[arg(long, value_name = "OUTPUT_PATH", requires = "headless")]
    pub output: Option<PathBuf>,

    /// Play in the terminal instead of opening a window
    #[arg(long, conflicts_with = "metrics")]
    pub console: bool,

    /// Print the Slack metrics payload for the CSV results under DATA_DIR
    #[arg(long, value_name = "DATA_DIR")]
    pub metrics: Option<PathBuf>,

    /// Random seed (overrides the headless config; fixes console/GUI rolls)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Game data file to load instead of assets/config/game_data.ron
    #[arg(long, value_name = "RON_FILE")]
    pub data: Option<PathBuf>,
}

pub fn parse_args() -> Args {
    Args::parse()
}
