//! Battle Scene UI
//!
//! Drives the battle state machine one turn per click: the player's skill
//! button records their choice, the bot picks at random, and the turn is
//! resolved immediately.
//!
//! ## UI Structure
//! ```text
//! ┌─────────────────────────────────────┐
//! │  Rival Fern's Sproutling  [■■■■□□]  │
//! │                                     │
//! │  Player's Flarepup        [■■■■■□]  │
//! │                                     │
//! │  [Tackle] [Ember] [Flame Burst]     │
//! │                                     │
//! │  Battle log (recent lines)          │
//! │                        [FORFEIT]    │
//! └─────────────────────────────────────┘
//! ```

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::battle::{Battle, BattleOutcome, Creature, GameRng, RandomSource, Side};
use crate::data::GameDatabase;
use crate::settings::GameSettings;

use super::{apply_dark_theme, title_color, BattleSelection, GameState, PlayerRoster};

/// Log lines shown under the skill buttons
const RECENT_LOG_LINES: usize = 8;

/// The battle currently on screen
#[derive(Resource)]
pub struct ActiveBattle {
    /// Taken when the scene exits
    pub battle: Option<Battle>,
    pub opponent_id: String,
}

/// Summary handed to the results screen
#[derive(Resource, Debug, Clone)]
pub struct BattleResults {
    pub outcome: BattleOutcome,
    pub opponent_name: String,
    pub turns: u32,
    pub player_creature: String,
    pub player_hp: i32,
    pub player_max_hp: i32,
    pub opponent_creature: String,
    pub opponent_hp: i32,
    pub opponent_max_hp: i32,
    pub damage_dealt: i32,
    pub damage_taken: i32,
}

impl BattleResults {
    pub fn from_battle(battle: &Battle) -> Self {
        let player = battle.player();
        let opponent = battle.opponent();
        Self {
            outcome: battle.outcome().unwrap_or(BattleOutcome::Quit),
            opponent_name: battle.trainer_name(Side::Opponent).to_string(),
            turns: battle.turn(),
            player_creature: player.display_name.clone(),
            player_hp: player.hp,
            player_max_hp: player.max_hp,
            opponent_creature: opponent.display_name.clone(),
            opponent_hp: opponent.hp,
            opponent_max_hp: opponent.max_hp,
            damage_dealt: battle.log().total_damage_by(Side::Player),
            damage_taken: battle.log().total_damage_by(Side::Opponent),
        }
    }
}

pub fn setup_battle(
    mut commands: Commands,
    db: Res<GameDatabase>,
    settings: Res<GameSettings>,
    roster: Res<PlayerRoster>,
    selection: Res<BattleSelection>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    info!("Entering Battle state");

    let Some(opponent_id) = selection.opponent_id.clone() else {
        warn!("No opponent selected");
        next_state.set(GameState::MainMenu);
        return;
    };
    let Some(bot) = db.create_trainer(&opponent_id) else {
        error!("Unknown opponent '{}'", opponent_id);
        next_state.set(GameState::MainMenu);
        return;
    };

    match Battle::from_trainers(&roster.trainer, &bot, settings.rules, db.type_chart().clone()) {
        Ok(battle) => {
            info!("Battle started: {} vs {}", roster.trainer.display_name, bot.display_name);
            commands.insert_resource(ActiveBattle {
                battle: Some(battle),
                opponent_id,
            });
        }
        Err(e) => {
            error!("Failed to start battle: {}", e);
            next_state.set(GameState::MainMenu);
        }
    }
}

/// Apply the leave rules and write the player's creature back to the roster
pub fn cleanup_battle(
    mut commands: Commands,
    active: Option<ResMut<ActiveBattle>>,
    mut roster: ResMut<PlayerRoster>,
) {
    if let Some(mut active) = active {
        if let Some(battle) = active.battle.take() {
            let (player_creature, _) = battle.leave();
            if let Some(slot) = roster.trainer.active_mut() {
                *slot = player_creature;
            }
        }
    }
    commands.remove_resource::<ActiveBattle>();
}

pub fn battle_ui(
    mut contexts: EguiContexts,
    mut commands: Commands,
    active: Option<ResMut<ActiveBattle>>,
    mut rng: ResMut<GameRng>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(mut active) = active else {
        return;
    };
    let active: &mut ActiveBattle = &mut active;
    let Some(battle) = active.battle.as_mut() else {
        return;
    };

    if battle.is_finished() {
        commands.insert_resource(BattleResults::from_battle(battle));
        next_state.set(GameState::Results);
        return;
    }

    let ctx = contexts.ctx_mut();
    apply_dark_theme(ctx);

    let mut picked_skill = None;
    let mut forfeit = false;

    egui::CentralPanel::default()
        .frame(
            egui::Frame::none()
                .fill(egui::Color32::from_rgb(20, 20, 30))
                .inner_margin(egui::Margin::same(20.0)),
        )
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(
                    egui::RichText::new(format!("TURN {}", battle.turn() + 1))
                        .size(36.0)
                        .color(title_color()),
                );
            });

            ui.add_space(20.0);
            render_creature_panel(
                ui,
                battle.trainer_name(Side::Opponent),
                battle.opponent(),
                egui::Color32::from_rgb(204, 51, 51),
            );
            ui.add_space(20.0);
            render_creature_panel(
                ui,
                battle.trainer_name(Side::Player),
                battle.player(),
                egui::Color32::from_rgb(51, 102, 204),
            );

            ui.add_space(30.0);
            ui.label(
                egui::RichText::new(format!("What will {} do?", battle.player().display_name))
                    .size(20.0),
            );
            ui.add_space(10.0);

            ui.horizontal_wrapped(|ui| {
                for (i, skill) in battle.player().skills.iter().enumerate() {
                    let text = format!("{}\n{} · {}", skill.display_name, skill.element.name(), skill.base_damage);
                    let button = egui::Button::new(egui::RichText::new(text).size(18.0))
                        .min_size(egui::vec2(180.0, 60.0));
                    if ui.add(button).clicked() {
                        picked_skill = Some(i);
                    }
                }
            });

            ui.add_space(30.0);
            ui.group(|ui| {
                ui.set_min_width(ui.available_width());
                ui.label(egui::RichText::new("Battle log").size(16.0).strong());
                for entry in battle.log().recent(RECENT_LOG_LINES) {
                    ui.label(egui::RichText::new(&entry.message).size(14.0));
                }
            });

            ui.with_layout(egui::Layout::bottom_up(egui::Align::RIGHT), |ui| {
                if ui.button(egui::RichText::new("FORFEIT").size(18.0)).clicked() {
                    forfeit = true;
                }
            });
        });

    if forfeit {
        info!("Player forfeited the battle against '{}'", active.opponent_id);
        battle.forfeit();
        return;
    }

    if let Some(index) = picked_skill {
        if let Err(e) = play_turn(battle, index, &mut *rng) {
            error!("Battle turn failed: {}", e);
            battle.forfeit();
        }
    }
}

/// Feed the player's pick and a random bot pick, then resolve the turn.
fn play_turn<R: RandomSource + ?Sized>(
    battle: &mut Battle,
    player_index: usize,
    rng: &mut R,
) -> Result<(), crate::battle::BattleError> {
    let Some(player_skill) = battle.player().skills.get(player_index).cloned() else {
        return Ok(());
    };
    battle.choose_player_skill(player_skill)?;

    let bot_skills = &battle.opponent().skills;
    let Some(bot_skill) = bot_skills.get(rng.pick_index(bot_skills.len())).cloned() else {
        warn!("Opponent has no skills; ending the battle");
        battle.forfeit();
        return Ok(());
    };
    battle.choose_opponent_skill(bot_skill)?;

    let report = battle.resolve_turn(rng)?;
    for line in &report.messages {
        info!("{}", line);
    }
    Ok(())
}

fn render_creature_panel(ui: &mut egui::Ui, trainer: &str, creature: &Creature, color: egui::Color32) {
    ui.group(|ui| {
        ui.set_min_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(format!("{}'s {}", trainer, creature.display_name))
                    .size(22.0)
                    .color(color),
            );
            ui.label(
                egui::RichText::new(creature.element.name())
                    .size(16.0)
                    .color(egui::Color32::from_rgb(150, 150, 150)),
            );
        });

        let fraction = creature.hp_fraction();
        let fill = if fraction > 0.5 {
            egui::Color32::from_rgb(51, 204, 51)
        } else if fraction > 0.2 {
            egui::Color32::from_rgb(230, 180, 50)
        } else {
            egui::Color32::from_rgb(204, 51, 51)
        };
        ui.add(
            egui::ProgressBar::new(fraction)
                .fill(fill)
                .text(format!("{}/{} HP", creature.hp, creature.max_hp)),
        );
    });
}
