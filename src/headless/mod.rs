//! Headless mode for batch simulation
//!
//! Runs battles between two trainers from the game database without any
//! graphical output. Both sides pick skills at random; the aggregated report
//! is written as JSON.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- --headless batch.json
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "player_trainer": "player",
//!   "opponent_trainer": "leaf_rival",
//!   "battles": 100,
//!   "random_seed": 42,
//!   "rules": { "damage_floor": "One", "turn_limit": 50 },
//!   "log_dir": "battle_reports/logs"
//! }
//! ```

pub mod config;
pub mod runner;

pub use config::HeadlessBattleConfig;
pub use runner::{
    run_headless, run_headless_battles, BattleRecord, HeadlessReport, HeadlessSession,
};
