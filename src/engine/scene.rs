//! Scenes driven through a [`BattleHost`]
//!
//! [`BattleScene`] runs one battle to completion. [`SceneRunner`] loops the
//! main menu and battle scenes until the player quits.

use bevy::log::info;

use crate::battle::{
    Battle, BattleLog, BattleOutcome, BattleRules, RandomSource, Trainer, TypeChart,
};
use crate::data::GameDatabase;

use super::{Actor, BattleHost, Choice, EngineError, SceneId};

/// What one battle scene produced.
#[derive(Debug, Clone)]
pub struct BattleSummary {
    pub outcome: BattleOutcome,
    pub opponent_name: String,
    pub turns: u32,
    /// Player creature HP when the battle ended (before any reset)
    pub player_hp: i32,
    /// Opponent creature HP when the battle ended (before any reset)
    pub opponent_hp: i32,
    pub log: BattleLog,
}

/// One battle against a bot built from `opponent_id`.
///
/// Holds the player's trainer by mutable reference: the active creature's HP
/// is written back when the scene ends, so stale HP carries over when
/// `reset_hp_on_exit` is off.
pub struct BattleScene<'a> {
    player: &'a mut Trainer,
    opponent_id: String,
    rules: BattleRules,
    chart: &'a TypeChart,
}

impl<'a> BattleScene<'a> {
    pub fn new(
        player: &'a mut Trainer,
        opponent_id: impl Into<String>,
        rules: BattleRules,
        chart: &'a TypeChart,
    ) -> Self {
        Self {
            player,
            opponent_id: opponent_id.into(),
            rules,
            chart,
        }
    }

    /// Run the battle loop until a side faints, the turn limit hits, or the
    /// host signals a quit.
    pub fn run<H, R>(&mut self, host: &mut H, rng: &mut R) -> Result<BattleSummary, EngineError>
    where
        H: BattleHost,
        R: RandomSource + ?Sized,
    {
        let bot = host.create_bot(&self.opponent_id)?;
        let mut battle =
            Battle::from_trainers(&*self.player, &bot, self.rules, self.chart.clone())?;

        info!(
            "Battle started: {} vs {} ({})",
            self.player.display_name, bot.display_name, self.opponent_id
        );
        for entry in &battle.log().entries {
            host.show_text(Actor::Player, &entry.message);
        }

        while !battle.is_finished() {
            let prompt = format!(
                "What will {} do? ({}/{} HP)",
                battle.player().display_name,
                battle.player().hp,
                battle.player().max_hp
            );
            let player_choice =
                host.wait_for_choice(Actor::Player, &prompt, &battle.player().skills);
            let player_skill = match player_choice {
                Ok(skill) => skill.clone(),
                Err(signal) => {
                    info!("Player left the battle: {:?}", signal);
                    battle.forfeit();
                    break;
                }
            };
            battle.choose_player_skill(player_skill)?;

            let opponent_choice =
                host.wait_for_choice(Actor::Bot, "Choose a skill", &battle.opponent().skills);
            let opponent_skill = match opponent_choice {
                Ok(skill) => skill.clone(),
                Err(signal) => {
                    info!("Bot left the battle: {:?}", signal);
                    battle.forfeit();
                    break;
                }
            };
            battle.choose_opponent_skill(opponent_skill)?;

            let report = battle.resolve_turn(rng)?;
            for line in &report.messages {
                host.show_text(Actor::Player, line);
                host.show_text(Actor::Bot, line);
            }
        }

        let outcome = battle.outcome().unwrap_or(BattleOutcome::Quit);
        info!("Battle finished after {} turns: {:?}", battle.turn(), outcome);

        let summary = BattleSummary {
            outcome,
            opponent_name: bot.display_name.clone(),
            turns: battle.turn(),
            player_hp: battle.player().hp,
            opponent_hp: battle.opponent().hp,
            log: battle.log().clone(),
        };

        let (player_creature, _) = battle.leave();
        if let Some(active) = self.player.active_mut() {
            *active = player_creature;
        }

        Ok(summary)
    }
}

/// Entries of the main menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuOption {
    /// Battle the trainer with this prototype id
    Battle { opponent_id: String, name: String },
    Quit,
}

impl Choice for MenuOption {
    fn label(&self) -> String {
        match self {
            MenuOption::Battle { name, .. } => format!("Battle {}", name),
            MenuOption::Quit => "Quit".to_string(),
        }
    }
}

/// Alternates between the main menu and battles until the player quits.
pub struct SceneRunner {
    player: Trainer,
    menu: Vec<MenuOption>,
    rules: BattleRules,
    chart: TypeChart,
}

impl SceneRunner {
    pub fn new(
        player: Trainer,
        menu: Vec<MenuOption>,
        rules: BattleRules,
        chart: TypeChart,
    ) -> Self {
        Self {
            player,
            menu,
            rules,
            chart,
        }
    }

    /// Build the menu from every trainer in the database except the player's.
    pub fn from_database(
        db: &GameDatabase,
        player_id: &str,
        rules: BattleRules,
    ) -> Result<Self, EngineError> {
        let player = db
            .create_trainer(player_id)
            .ok_or_else(|| EngineError::UnknownPrototype(player_id.to_string()))?;
        let mut menu: Vec<MenuOption> = db
            .trainer_ids()
            .into_iter()
            .filter(|id| *id != player_id)
            .map(|id| MenuOption::Battle {
                opponent_id: id.to_string(),
                name: db.trainer_name(id).unwrap_or(id).to_string(),
            })
            .collect();
        menu.push(MenuOption::Quit);
        Ok(Self::new(player, menu, rules, db.type_chart().clone()))
    }

    pub fn player(&self) -> &Trainer {
        &self.player
    }

    /// Run scenes until the player quits. Returns every finished battle.
    pub fn run<H, R>(
        &mut self,
        host: &mut H,
        rng: &mut R,
    ) -> Result<Vec<BattleSummary>, EngineError>
    where
        H: BattleHost,
        R: RandomSource + ?Sized,
    {
        let mut history = Vec::new();
        let mut scene = SceneId::MainMenu;
        let mut opponent_id = String::new();

        loop {
            match scene {
                SceneId::MainMenu => {
                    let picked = host
                        .wait_for_choice(Actor::Player, "Main menu", &self.menu)
                        .cloned();
                    match picked {
                        Ok(MenuOption::Battle { opponent_id: id, .. }) => {
                            opponent_id = id;
                            scene = SceneId::Battle;
                            host.transition(scene);
                        }
                        Ok(MenuOption::Quit) | Err(_) => {
                            host.quit();
                            return Ok(history);
                        }
                    }
                }
                SceneId::Battle => {
                    let mut battle_scene = BattleScene::new(
                        &mut self.player,
                        opponent_id.as_str(),
                        self.rules,
                        &self.chart,
                    );
                    let summary = battle_scene.run(host, rng)?;
                    let outcome = summary.outcome;
                    history.push(summary);

                    if outcome == BattleOutcome::Quit {
                        host.quit();
                        return Ok(history);
                    }
                    scene = SceneId::MainMenu;
                    host.transition(scene);
                }
            }
        }
    }
}
