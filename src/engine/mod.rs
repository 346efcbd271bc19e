//! Host engine contract
//!
//! Battle logic talks to whatever is hosting it (a terminal, an automated
//! runner, a test double) through four verbs only:
//!
//! - `create_bot` builds the opposing side from a prototype id
//! - `wait_for_choice` blocks until an actor picks one of the given options
//! - `show_text` shows a line to an actor
//! - `transition` / `quit` move to another scene or end the game
//!
//! Quitting is reported as a [`HostSignal`] from `wait_for_choice` and turned
//! into [`BattleOutcome::Quit`](crate::battle::BattleOutcome::Quit) by the
//! scene, never unwound through the caller.

use std::fmt;

use crate::battle::{BattleError, Side, Skill, Trainer};
use crate::data::GameDatabase;

pub mod auto;
pub mod console;
pub mod scene;

pub use auto::AutoHost;
pub use console::ConsoleHost;
pub use scene::{BattleScene, BattleSummary, MenuOption, SceneRunner};

/// Who a choice or message is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Actor {
    /// The human-controlled side
    Player,
    /// The engine-provided opponent
    Bot,
}

impl From<Side> for Actor {
    fn from(side: Side) -> Self {
        match side {
            Side::Player => Actor::Player,
            Side::Opponent => Actor::Bot,
        }
    }
}

/// Named scenes the host can move between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneId {
    MainMenu,
    Battle,
}

/// Control-flow signals raised by the host while waiting for input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSignal {
    /// The user asked to leave the game
    Quit,
    /// An automated driver ran out of budget and wants a clean stop
    GracefulExit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// `create_bot` was given an id the database does not know
    UnknownPrototype(String),
    /// The battle state machine rejected an operation
    Battle(BattleError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::UnknownPrototype(id) => write!(f, "unknown bot prototype '{}'", id),
            EngineError::Battle(e) => write!(f, "battle error: {}", e),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<BattleError> for EngineError {
    fn from(e: BattleError) -> Self {
        EngineError::Battle(e)
    }
}

/// Anything that can be offered as a choice.
pub trait Choice {
    fn label(&self) -> String;
}

impl Choice for Skill {
    fn label(&self) -> String {
        format!(
            "{} [{}, power {}]",
            self.display_name,
            self.element.name(),
            self.base_damage
        )
    }
}

/// The boundary battle logic calls into.
pub trait BattleHost {
    /// Build the opposing side from a prototype id.
    fn create_bot(&mut self, prototype_id: &str) -> Result<Trainer, EngineError>;

    /// Block until `actor` picks one of `options`; the pick is returned by
    /// reference. An empty `options` slice yields `HostSignal::GracefulExit`.
    fn wait_for_choice<'a, T: Choice>(
        &mut self,
        actor: Actor,
        prompt: &str,
        options: &'a [T],
    ) -> Result<&'a T, HostSignal>;

    /// Show a line of text to `actor`.
    fn show_text(&mut self, actor: Actor, text: &str);

    /// Move to another scene.
    fn transition(&mut self, scene: SceneId);

    /// End the whole game.
    fn quit(&mut self);
}

/// Shared `create_bot` implementation for database-backed hosts.
pub(crate) fn bot_from_database(
    db: &GameDatabase,
    prototype_id: &str,
) -> Result<Trainer, EngineError> {
    db.create_trainer(prototype_id)
        .ok_or_else(|| EngineError::UnknownPrototype(prototype_id.to_string()))
}
