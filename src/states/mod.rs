//! Game state management
//!
//! Defines the core game states and transitions between them.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::battle::{DamageFloor, Trainer};
use crate::data::GameDatabase;
use crate::settings::GameSettings;

pub mod battle_ui;
pub mod results_ui;

pub use battle_ui::{ActiveBattle, BattleResults};

/// The core game states representing the main screens of the game.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Main menu - pick an opponent, tweak rules
    #[default]
    MainMenu,
    /// A battle in progress
    Battle,
    /// Post-battle results
    Results,
}

/// The player's trainer, kept between battles so HP can carry over when
/// `reset_hp_on_exit` is off.
#[derive(Resource, Debug, Clone)]
pub struct PlayerRoster {
    pub trainer: Trainer,
}

/// Opponent picked on the main menu
#[derive(Resource, Debug, Clone, Default)]
pub struct BattleSelection {
    pub opponent_id: Option<String>,
}

/// Plugin for managing game states and transitions
///
/// Expects `GameDatabase`, `GameSettings`, `GameRng` and `PlayerRoster`
/// resources.
pub struct StatesPlugin;

impl Plugin for StatesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BattleSelection>()
            .add_systems(Startup, setup_camera)
            // Main menu systems
            .add_systems(Update, main_menu_ui.run_if(in_state(GameState::MainMenu)))
            // Battle systems
            .add_systems(OnEnter(GameState::Battle), battle_ui::setup_battle)
            .add_systems(Update, battle_ui::battle_ui.run_if(in_state(GameState::Battle)))
            .add_systems(OnExit(GameState::Battle), battle_ui::cleanup_battle)
            // Results systems
            .add_systems(Update, results_ui::results_ui.run_if(in_state(GameState::Results)));
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Shared dark theme for every screen
pub(crate) fn apply_dark_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    style.visuals.window_fill = egui::Color32::from_rgb(20, 20, 30);
    style.visuals.panel_fill = egui::Color32::from_rgb(20, 20, 30);
    ctx.set_style(style);
}

pub(crate) fn title_color() -> egui::Color32 {
    egui::Color32::from_rgb(230, 204, 153)
}

fn menu_button(text: &str) -> egui::Button<'static> {
    egui::Button::new(
        egui::RichText::new(text.to_string())
            .size(28.0)
            .color(egui::Color32::from_rgb(230, 217, 191)),
    )
}

// ============================================================================
// Main Menu (egui)
// ============================================================================

fn main_menu_ui(
    mut contexts: EguiContexts,
    db: Res<GameDatabase>,
    roster: Res<PlayerRoster>,
    mut settings: ResMut<GameSettings>,
    mut selection: ResMut<BattleSelection>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit_events: EventWriter<AppExit>,
) {
    let ctx = contexts.ctx_mut();
    apply_dark_theme(ctx);

    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(egui::Color32::from_rgb(20, 20, 30)))
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(80.0);

                ui.heading(egui::RichText::new("BATTLER").size(72.0).color(title_color()));
                ui.add_space(10.0);
                ui.label(
                    egui::RichText::new("Turn-Based Creature Battles")
                        .size(24.0)
                        .color(egui::Color32::from_rgb(153, 140, 128)),
                );

                ui.add_space(30.0);

                if let Some(creature) = roster.trainer.active() {
                    ui.label(
                        egui::RichText::new(format!(
                            "{} fights with {} ({}/{} HP)",
                            roster.trainer.display_name, creature.display_name, creature.hp, creature.max_hp
                        ))
                        .size(18.0),
                    );
                }

                ui.add_space(20.0);
                ui.label(egui::RichText::new("Choose an opponent").size(22.0).color(title_color()));
                ui.add_space(10.0);

                for id in db.trainer_ids() {
                    if id == settings.player_trainer {
                        continue;
                    }
                    let name = db.trainer_name(id).unwrap_or(id);
                    let selected = selection.opponent_id.as_deref() == Some(id);
                    if ui
                        .add_sized(egui::vec2(280.0, 36.0), egui::SelectableLabel::new(selected, name))
                        .clicked()
                    {
                        selection.opponent_id = Some(id.to_string());
                    }
                }

                ui.add_space(20.0);

                // Edit a copy so the settings resource only changes on click.
                let mut rules = settings.rules;
                let mut min_damage_one = rules.damage_floor == DamageFloor::One;
                ui.checkbox(&mut rules.reset_hp_on_exit, "Restore HP after each battle");
                ui.checkbox(&mut min_damage_one, "Every hit deals at least 1 damage");
                rules.damage_floor = if min_damage_one { DamageFloor::One } else { DamageFloor::Zero };
                if rules != settings.rules {
                    settings.rules = rules;
                }

                ui.add_space(30.0);

                let button_size = egui::vec2(280.0, 60.0);
                let can_battle = selection.opponent_id.is_some();
                if ui
                    .add_enabled_ui(can_battle, |ui| ui.add_sized(button_size, menu_button("BATTLE")))
                    .inner
                    .clicked()
                {
                    info!("Battle button pressed - transitioning to Battle");
                    next_state.set(GameState::Battle);
                }

                ui.add_space(10.0);

                if ui.add_sized(button_size, menu_button("EXIT")).clicked() {
                    info!("Exit button pressed - quitting application");
                    exit_events.send(AppExit::Success);
                }
            });

            ui.with_layout(egui::Layout::bottom_up(egui::Align::RIGHT), |ui| {
                ui.add_space(20.0);
                ui.horizontal(|ui| {
                    ui.add_space(20.0);
                    ui.label(
                        egui::RichText::new(concat!("v", env!("CARGO_PKG_VERSION")))
                            .size(14.0)
                            .color(egui::Color32::from_rgb(102, 102, 102)),
                    );
                });
            });
        });
}
