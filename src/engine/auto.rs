//! Automated host
//!
//! Both actors pick uniformly at random. Text is kept in memory instead of
//! being printed. Used by the headless runner and by tests.

use bevy::log::debug;

use crate::battle::{RandomSource, Trainer};
use crate::data::GameDatabase;

use super::{bot_from_database, Actor, BattleHost, Choice, EngineError, HostSignal, SceneId};

pub struct AutoHost<'a, R: RandomSource> {
    db: &'a GameDatabase,
    rng: R,
    /// Remaining choices before a `GracefulExit` (None = unlimited)
    choice_budget: Option<usize>,
    transcript: Vec<(Actor, String)>,
    scenes: Vec<SceneId>,
    quit_requested: bool,
}

impl<'a, R: RandomSource> AutoHost<'a, R> {
    pub fn new(db: &'a GameDatabase, rng: R) -> Self {
        Self {
            db,
            rng,
            choice_budget: None,
            transcript: Vec::new(),
            scenes: Vec::new(),
            quit_requested: false,
        }
    }

    /// Stop with `HostSignal::GracefulExit` after `budget` choices.
    pub fn with_choice_budget(mut self, budget: usize) -> Self {
        self.choice_budget = Some(budget);
        self
    }

    /// Every line shown, with the actor it was shown to
    pub fn transcript(&self) -> &[(Actor, String)] {
        &self.transcript
    }

    /// Lines shown to one actor
    pub fn lines_for(&self, actor: Actor) -> Vec<&str> {
        self.transcript
            .iter()
            .filter(|(a, _)| *a == actor)
            .map(|(_, line)| line.as_str())
            .collect()
    }

    /// Scenes transitioned to, in order
    pub fn scenes(&self) -> &[SceneId] {
        &self.scenes
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}

impl<'a, R: RandomSource> BattleHost for AutoHost<'a, R> {
    fn create_bot(&mut self, prototype_id: &str) -> Result<Trainer, EngineError> {
        bot_from_database(self.db, prototype_id)
    }

    fn wait_for_choice<'o, T: Choice>(
        &mut self,
        actor: Actor,
        _prompt: &str,
        options: &'o [T],
    ) -> Result<&'o T, HostSignal> {
        if let Some(budget) = self.choice_budget.as_mut() {
            if *budget == 0 {
                return Err(HostSignal::GracefulExit);
            }
            *budget -= 1;
        }
        let picked = options
            .get(self.rng.pick_index(options.len()))
            .ok_or(HostSignal::GracefulExit)?;
        debug!("{:?} picked {}", actor, picked.label());
        Ok(picked)
    }

    fn show_text(&mut self, actor: Actor, text: &str) {
        self.transcript.push((actor, text.to_string()));
    }

    fn transition(&mut self, scene: SceneId) {
        self.scenes.push(scene);
    }

    fn quit(&mut self) {
        self.quit_requested = true;
    }
}
