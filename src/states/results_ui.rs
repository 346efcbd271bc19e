//! Results Scene UI - Post-Battle Summary
//!
//! Reads the `BattleResults` resource inserted by the battle scene and shows
//! the outcome, both creatures' final HP and the damage totals. DONE returns
//! to the main menu.
//!
//! ## UI Structure
//! ```text
//! ┌─────────────────────────────────────┐
//! │         BATTLE RESULTS              │
//! │         [YOU WON!]                  │
//! │                                     │
//! │  Creature   HP     Dmg Dlt  Dmg Tkn │
//! │  ...                                │
//! │                                     │
//! │           [DONE]                    │
//! └─────────────────────────────────────┘
//! ```

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use super::{apply_dark_theme, title_color, BattleResults, GameState};
use crate::battle::BattleOutcome;

pub fn results_ui(
    mut contexts: EguiContexts,
    results: Option<Res<BattleResults>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut commands: Commands,
) {
    let ctx = contexts.ctx_mut();
    apply_dark_theme(ctx);

    egui::CentralPanel::default()
        .frame(
            egui::Frame::none()
                .fill(egui::Color32::from_rgb(20, 20, 30))
                .inner_margin(egui::Margin::same(20.0)),
        )
        .show(ctx, |ui| {
            ui.add_space(20.0);

            ui.vertical_centered(|ui| {
                ui.heading(egui::RichText::new("BATTLE RESULTS").size(48.0).color(title_color()));
            });

            ui.add_space(30.0);

            if let Some(results) = results.as_deref() {
                ui.vertical_centered(|ui| {
                    let (text, color) = outcome_display(results.outcome);
                    ui.heading(egui::RichText::new(text).size(36.0).color(color));
                    ui.add_space(10.0);
                    ui.label(
                        egui::RichText::new(format!("vs {} · {} turns", results.opponent_name, results.turns))
                            .size(18.0)
                            .color(egui::Color32::from_rgb(153, 140, 128)),
                    );
                });

                ui.add_space(40.0);
                ui.vertical_centered(|ui| render_stats(ui, results));
            } else {
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new("No battle results available")
                            .size(24.0)
                            .color(egui::Color32::from_rgb(200, 100, 100)),
                    );
                });
            }

            ui.add_space(40.0);

            ui.vertical_centered(|ui| {
                let button = egui::Button::new(
                    egui::RichText::new("DONE")
                        .size(24.0)
                        .color(egui::Color32::from_rgb(230, 242, 230)),
                )
                .min_size(egui::vec2(200.0, 50.0));

                if ui.add(button).clicked() {
                    commands.remove_resource::<BattleResults>();
                    next_state.set(GameState::MainMenu);
                }
            });
        });
}

fn outcome_display(outcome: BattleOutcome) -> (&'static str, egui::Color32) {
    match outcome {
        BattleOutcome::Win => ("YOU WON!", egui::Color32::from_rgb(100, 150, 255)),
        BattleOutcome::Loss => ("YOU LOST", egui::Color32::from_rgb(255, 100, 100)),
        BattleOutcome::Draw => ("DRAW", egui::Color32::from_rgb(200, 200, 100)),
        BattleOutcome::Quit => ("FORFEITED", egui::Color32::from_rgb(150, 150, 150)),
    }
}

fn render_stats(ui: &mut egui::Ui, results: &BattleResults) {
    ui.group(|ui| {
        egui::Grid::new("battle_results_grid")
            .spacing([30.0, 8.0])
            .show(ui, |ui| {
                ui.label(egui::RichText::new("Creature").size(14.0).strong());
                ui.label(egui::RichText::new("HP").size(14.0).strong());
                ui.label(egui::RichText::new("Dmg Dlt").size(14.0).strong());
                ui.end_row();

                let rows = [
                    (
                        &results.player_creature,
                        results.player_hp,
                        results.player_max_hp,
                        results.damage_dealt,
                        egui::Color32::from_rgb(100, 150, 255),
                    ),
                    (
                        &results.opponent_creature,
                        results.opponent_hp,
                        results.opponent_max_hp,
                        results.damage_taken,
                        egui::Color32::from_rgb(255, 100, 100),
                    ),
                ];
                for (name, hp, max_hp, dealt, color) in rows {
                    ui.label(egui::RichText::new(name.as_str()).size(15.0).color(color));
                    ui.label(egui::RichText::new(format!("{}/{}", hp, max_hp)).size(15.0));
                    ui.label(
                        egui::RichText::new(dealt.to_string())
                            .size(15.0)
                            .color(egui::Color32::from_rgb(255, 150, 100)),
                    );
                    ui.end_row();
                }
            });
    });
}
