//! JSON configuration parsing for headless mode
//!
//! Parses JSON batch configurations and resolves them against the game database.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::battle::BattleRules;
use crate::data::GameDatabase;

/// Turn limit applied when a headless config does not set one
pub const DEFAULT_HEADLESS_TURN_LIMIT: u32 = 200;

/// Upper bound on battles per run
pub const MAX_BATTLES: u32 = 100_000;

/// Headless batch configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessBattleConfig {
    /// Trainer prototype id for the player side
    pub player_trainer: String,
    /// Trainer prototype id for the bot side
    pub opponent_trainer: String,
    /// Number of battles to run (default: 1)
    #[serde(default = "default_battles")]
    pub battles: u32,
    /// Random seed for deterministic reproduction
    /// If provided, every choice and speed tie is drawn from seeded RNGs
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Rule overrides (default: standard rules with a turn limit)
    #[serde(default)]
    pub rules: Option<BattleRules>,
    /// Custom output path for the report (optional)
    #[serde(default)]
    pub output_path: Option<String>,
    /// Directory for per-battle JSON logs (optional, none written if unset)
    #[serde(default)]
    pub log_dir: Option<String>,
    /// Alternate game data file (default: assets/config/game_data.ron)
    #[serde(default)]
    pub game_data_path: Option<String>,
}

fn default_battles() -> u32 {
    1
}

impl HeadlessBattleConfig {
    pub fn new(player_trainer: impl Into<String>, opponent_trainer: impl Into<String>) -> Self {
        Self {
            player_trainer: player_trainer.into(),
            opponent_trainer: opponent_trainer.into(),
            battles: default_battles(),
            random_seed: None,
            rules: None,
            output_path: None,
            log_dir: None,
            game_data_path: None,
        }
    }

    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_json_str(&contents)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, String> {
        let config: HeadlessBattleConfig = serde_json::from_str(contents)
            .map_err(|e| format!("Failed to parse JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration on its own
    pub fn validate(&self) -> Result<(), String> {
        if self.player_trainer.trim().is_empty() {
            return Err("player_trainer must not be empty".to_string());
        }
        if self.opponent_trainer.trim().is_empty() {
            return Err("opponent_trainer must not be empty".to_string());
        }

        if self.battles == 0 || self.battles > MAX_BATTLES {
            return Err(format!("battles must be between 1 and {}", MAX_BATTLES));
        }

        if let Some(rules) = &self.rules {
            if rules.turn_limit == Some(0) {
                return Err("rules.turn_limit must be positive".to_string());
            }
        }

        Ok(())
    }

    /// Check that both trainer ids exist in `db`
    pub fn validate_against(&self, db: &GameDatabase) -> Result<(), String> {
        for id in [&self.player_trainer, &self.opponent_trainer] {
            if db.create_trainer(id).is_none() {
                return Err(format!(
                    "Unknown trainer: '{}'. Valid trainers: {}",
                    id,
                    db.trainer_ids().join(", ")
                ));
            }
        }
        Ok(())
    }

    /// Rules to run with; a missing turn limit gets the headless default so
    /// zero-damage matchups still terminate.
    pub fn effective_rules(&self) -> BattleRules {
        let mut rules = self.rules.unwrap_or_default();
        if rules.turn_limit.is_none() {
            rules.turn_limit = Some(DEFAULT_HEADLESS_TURN_LIMIT);
        }
        rules
    }
}
