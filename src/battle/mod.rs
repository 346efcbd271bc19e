//! Battle core
//!
//! Implements the turn-based battle rules:
//! - Creatures, skills and trainers
//! - Type effectiveness
//! - Damage calculation with configurable floor
//! - Turn order with an injected random source
//! - The per-turn state machine
//! - Battle logging

pub mod creature;
pub mod damage;
pub mod effectiveness;
pub mod log;
pub mod state;
pub mod turn_order;

pub use creature::{Creature, ElementType, Side, Skill, SkillCategory, Trainer};
pub use damage::{BattleRules, DamageCalculator, DamageFloor, DamageRoll};
pub use effectiveness::{TypeChart, TypeMatchup};
pub use log::{BattleLog, BattleLogEntry, BattleLogEventType};
pub use state::{AttackReport, Battle, BattleError, BattleOutcome, BattlePhase, TurnReport};
pub use turn_order::{resolve_turn_order, GameRng, RandomSource, TurnAction};
