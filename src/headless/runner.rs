//! Headless batch execution
//!
//! Runs battles between two database trainers with both sides choosing at
//! random, suitable for balance checks and automated testing.

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::battle::{BattleOutcome, BattleRules, GameRng, Side, Trainer, TypeChart};
use crate::data::GameDatabase;
use crate::engine::{AutoHost, BattleScene};

use super::config::HeadlessBattleConfig;

/// Where the report goes when the config names no output path
pub const DEFAULT_REPORT_PATH: &str = "battle_reports/headless_report.json";

/// Result of one completed battle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleRecord {
    /// 1-based position in the batch
    pub index: u32,
    pub outcome: BattleOutcome,
    /// Resolved turns
    pub turns: u32,
    /// Player creature HP at the end of the battle
    pub player_hp: i32,
    /// Opponent creature HP at the end of the battle
    pub opponent_hp: i32,
    /// Total damage the player creature dealt
    pub damage_dealt: i32,
    /// Total damage the player creature took
    pub damage_taken: i32,
}

/// Aggregate result of a headless run
///
/// Same seed and config produce an identical report.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeadlessReport {
    pub player_trainer: String,
    pub opponent_trainer: String,
    pub battles: Vec<BattleRecord>,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    /// Battles abandoned before an outcome
    pub quits: u32,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
}

impl HeadlessReport {
    pub fn win_rate(&self) -> f64 {
        if self.battles.is_empty() {
            return 0.0;
        }
        self.wins as f64 / self.battles.len() as f64
    }

    fn record(&mut self, record: BattleRecord) {
        match record.outcome {
            BattleOutcome::Win => self.wins += 1,
            BattleOutcome::Loss => self.losses += 1,
            BattleOutcome::Draw => self.draws += 1,
            BattleOutcome::Quit => self.quits += 1,
        }
        self.battles.push(record);
    }

    /// Save as pretty JSON, creating parent directories as needed
    pub fn save_to_file(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
            }
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize report: {}", e))?;
        std::fs::write(path, json).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
    }
}

/// State of a batch in progress
///
/// The player trainer persists across battles, so with `reset_hp_on_exit`
/// off its creature starts each battle with the HP it ended the last one on.
#[derive(Resource)]
pub struct HeadlessSession {
    player: Trainer,
    opponent_id: String,
    rules: BattleRules,
    chart: TypeChart,
    /// Drives both actors' choices
    choice_rng: GameRng,
    /// Drives speed ties
    order_rng: GameRng,
    total: u32,
    output_path: Option<String>,
    log_dir: Option<PathBuf>,
    report: HeadlessReport,
}

impl HeadlessSession {
    pub fn new(config: &HeadlessBattleConfig, db: &GameDatabase) -> Result<Self, String> {
        config.validate()?;
        config.validate_against(db)?;

        let player = db
            .create_trainer(&config.player_trainer)
            .ok_or_else(|| format!("Unknown trainer: '{}'", config.player_trainer))?;

        // Choices and turn order get separate streams so adding a choice
        // does not shift every later tie-break.
        let (choice_rng, order_rng) = match config.random_seed {
            Some(seed) => {
                info!("Using deterministic RNG with seed: {}", seed);
                (GameRng::from_seed(seed.wrapping_add(1)), GameRng::from_seed(seed))
            }
            None => {
                info!("Using non-deterministic RNG (no seed provided)");
                (GameRng::from_entropy(), GameRng::from_entropy())
            }
        };

        Ok(Self {
            player,
            opponent_id: config.opponent_trainer.clone(),
            rules: config.effective_rules(),
            chart: db.type_chart().clone(),
            choice_rng,
            order_rng,
            total: config.battles,
            output_path: config.output_path.clone(),
            log_dir: config.log_dir.as_ref().map(PathBuf::from),
            report: HeadlessReport {
                player_trainer: config.player_trainer.clone(),
                opponent_trainer: config.opponent_trainer.clone(),
                random_seed: config.random_seed,
                ..Default::default()
            },
        })
    }

    pub fn is_complete(&self) -> bool {
        self.report.battles.len() as u32 >= self.total
    }

    pub fn report(&self) -> &HeadlessReport {
        &self.report
    }

    pub fn into_report(self) -> HeadlessReport {
        self.report
    }

    /// Run the next battle. Returns `None` once the batch is done.
    pub fn step(&mut self, db: &GameDatabase) -> Result<Option<&BattleRecord>, String> {
        if self.is_complete() {
            return Ok(None);
        }

        let mut host = AutoHost::new(db, &mut self.choice_rng);
        let mut scene =
            BattleScene::new(&mut self.player, self.opponent_id.as_str(), self.rules, &self.chart);
        let summary = scene
            .run(&mut host, &mut self.order_rng)
            .map_err(|e| e.to_string())?;

        let index = self.report.battles.len() as u32 + 1;
        if let Some(dir) = &self.log_dir {
            summary
                .log
                .save_to_file(&dir.join(format!("battle_{:04}.json", index)))?;
        }
        self.report.record(BattleRecord {
            index,
            outcome: summary.outcome,
            turns: summary.turns,
            player_hp: summary.player_hp,
            opponent_hp: summary.opponent_hp,
            damage_dealt: summary.log.total_damage_by(Side::Player),
            damage_taken: summary.log.total_damage_by(Side::Opponent),
        });
        Ok(self.report.battles.last())
    }
}

/// Run a whole batch synchronously and return its report
pub fn run_headless_battles(
    config: &HeadlessBattleConfig,
    db: &GameDatabase,
) -> Result<HeadlessReport, String> {
    let mut session = HeadlessSession::new(config, db)?;
    while session.step(db)?.is_some() {}
    Ok(session.into_report())
}

/// Resource to track whether the app should exit
#[derive(Resource, Default)]
struct HeadlessStatus {
    complete: bool,
    failed: bool,
}

/// Plugin for headless batch execution
///
/// Expects `GameDatabase` and `HeadlessSession` resources; runs one battle
/// per frame.
pub struct HeadlessPlugin;

impl Plugin for HeadlessPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HeadlessStatus>()
            .add_systems(Update, headless_run_battle)
            .add_systems(PostUpdate, headless_exit_on_complete);
    }
}

fn headless_run_battle(
    db: Res<GameDatabase>,
    mut session: ResMut<HeadlessSession>,
    mut status: ResMut<HeadlessStatus>,
) {
    if status.complete {
        return;
    }

    match session.step(&db) {
        Ok(Some(record)) => {
            info!(
                "Battle {} finished after {} turns: {:?}",
                record.index, record.turns, record.outcome
            );
        }
        Ok(None) => {}
        Err(e) => {
            error!("Headless battle failed: {}", e);
            status.failed = true;
            status.complete = true;
            return;
        }
    }

    if session.is_complete() {
        let report = session.report();
        info!(
            "Batch complete: {} wins, {} losses, {} draws, {} quits ({:.1}% win rate)",
            report.wins,
            report.losses,
            report.draws,
            report.quits,
            report.win_rate() * 100.0
        );
        let path = session.output_path.as_deref().unwrap_or(DEFAULT_REPORT_PATH);
        match report.save_to_file(Path::new(path)) {
            Ok(()) => println!("Batch complete. Report saved to: {}", path),
            Err(e) => {
                eprintln!("Failed to save report: {}", e);
                status.failed = true;
            }
        }
        status.complete = true;
    }
}

/// Exit the app when the batch is complete
fn headless_exit_on_complete(status: Res<HeadlessStatus>, mut exit: EventWriter<AppExit>) {
    if status.complete {
        if status.failed {
            exit.send(AppExit::error());
        } else {
            exit.send(AppExit::Success);
        }
    }
}

/// Run a headless batch with the given configuration
pub fn run_headless(config: HeadlessBattleConfig) -> Result<(), String> {
    let db = match &config.game_data_path {
        Some(path) => GameDatabase::load_from_file(Path::new(path))?,
        None => GameDatabase::load_default()?,
    };
    let session = HeadlessSession::new(&config, &db)?;

    println!("Starting headless battle simulation...");
    println!("  Player: {}", config.player_trainer);
    println!("  Opponent: {}", config.opponent_trainer);
    println!("  Battles: {}", config.battles);

    let exit = App::new()
        // Minimal plugins - no window, no rendering
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::ZERO)))
        .add_plugins(LogPlugin::default())
        .insert_resource(db)
        .insert_resource(session)
        .add_plugins(HeadlessPlugin)
        .run();

    match exit {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => Err(format!("Headless run failed (exit code {})", code)),
    }
}
