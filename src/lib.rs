//! Battler - Turn-Based Creature Battler
//!
//! Two creatures trade skills until one faints. The faster creature acts
//! first, damage is scaled by a type chart, and the battle logic talks to
//! whatever hosts it through the [`engine::BattleHost`] trait.
//!
//! This library exposes the core game modules for testing and reuse.

pub mod battle;
pub mod cli;
pub mod data;
pub mod engine;
pub mod headless;
pub mod metrics;
pub mod settings;
pub mod states;

// Re-export commonly used types
pub use battle::{
    Battle, BattleOutcome, BattleRules, Creature, ElementType, GameRng, Skill, Trainer, TypeChart,
};
pub use data::GameDatabase;
pub use engine::{AutoHost, BattleHost, BattleScene, ConsoleHost};
pub use headless::HeadlessBattleConfig;
