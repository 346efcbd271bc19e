//! Interactive text host
//!
//! The player picks numbered options on a line-based input; `q` or end of
//! input quits. The bot picks at random. Generic over the reader and writer
//! so tests can script a session.

use bevy::log::{info, warn};
use std::io::{BufRead, Write};

use crate::battle::{RandomSource, Trainer};
use crate::data::GameDatabase;

use super::{bot_from_database, Actor, BattleHost, Choice, EngineError, HostSignal, SceneId};

pub struct ConsoleHost<'a, In: BufRead, Out: Write, R: RandomSource> {
    db: &'a GameDatabase,
    input: In,
    output: Out,
    rng: R,
}

impl<'a, In: BufRead, Out: Write, R: RandomSource> ConsoleHost<'a, In, Out, R> {
    pub fn new(db: &'a GameDatabase, input: In, output: Out, rng: R) -> Self {
        Self {
            db,
            input,
            output,
            rng,
        }
    }

    /// Hand back the writer (tests inspect what was printed).
    pub fn into_output(self) -> Out {
        self.output
    }

    fn write_line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.output, "{}", text) {
            warn!("Failed to write to console: {}", e);
        }
    }

    fn read_line(&mut self) -> Option<String> {
        let _ = self.output.flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                warn!("Failed to read from console: {}", e);
                None
            }
        }
    }
}

impl<'a, In: BufRead, Out: Write, R: RandomSource> BattleHost for ConsoleHost<'a, In, Out, R> {
    fn create_bot(&mut self, prototype_id: &str) -> Result<Trainer, EngineError> {
        bot_from_database(self.db, prototype_id)
    }

    fn wait_for_choice<'o, T: Choice>(
        &mut self,
        actor: Actor,
        prompt: &str,
        options: &'o [T],
    ) -> Result<&'o T, HostSignal> {
        if options.is_empty() {
            return Err(HostSignal::GracefulExit);
        }

        if actor == Actor::Bot {
            return options
                .get(self.rng.pick_index(options.len()))
                .ok_or(HostSignal::GracefulExit);
        }

        self.write_line(prompt);
        for (i, option) in options.iter().enumerate() {
            let line = format!("  {}) {}", i + 1, option.label());
            self.write_line(&line);
        }

        loop {
            if let Err(e) = write!(self.output, "> ") {
                warn!("Failed to write prompt: {}", e);
            }
            let Some(answer) = self.read_line() else {
                return Err(HostSignal::Quit);
            };
            if answer.eq_ignore_ascii_case("q") || answer.eq_ignore_ascii_case("quit") {
                return Err(HostSignal::Quit);
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(&options[n - 1]),
                _ => {
                    let hint = format!(
                        "Please enter a number from 1 to {} (or q to quit).",
                        options.len()
                    );
                    self.write_line(&hint);
                }
            }
        }
    }

    fn show_text(&mut self, actor: Actor, text: &str) {
        // The bot has no screen.
        if actor == Actor::Player {
            self.write_line(text);
        }
    }

    fn transition(&mut self, scene: SceneId) {
        info!("Transitioning to {:?}", scene);
        if scene == SceneId::MainMenu {
            self.write_line("");
        }
    }

    fn quit(&mut self) {
        self.write_line("Thanks for playing!");
    }
}
