//! Battler - Turn-Based Creature Battler
//!
//! Pick an opponent, choose a skill each turn, and battle until one creature
//! faints. Runs as a window (default), in the terminal, headless, or as the
//! metrics reporter.

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use std::path::Path;
use std::process::ExitCode;

use battler::battle::GameRng;
use battler::cli::{self, Args};
use battler::data::GameDatabase;
use battler::engine::{ConsoleHost, SceneRunner};
use battler::headless::{run_headless, HeadlessBattleConfig};
use battler::metrics;
use battler::settings::{GameSettings, SettingsPlugin};
use battler::states::{GameState, PlayerRoster, StatesPlugin};

fn main() -> ExitCode {
    let args = cli::parse_args();

    let result = if let Some(dir) = &args.metrics {
        println!("{}", metrics::render_output(dir));
        Ok(())
    } else if let Some(config_path) = &args.headless {
        run_headless_mode(&args, config_path)
    } else if args.console {
        run_console_mode(&args)
    } else {
        run_gui_mode(&args)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_database(args: &Args) -> Result<GameDatabase, String> {
    match &args.data {
        Some(path) => GameDatabase::load_from_file(path),
        None => GameDatabase::load_default(),
    }
}

fn run_headless_mode(args: &Args, config_path: &Path) -> Result<(), String> {
    let mut config = HeadlessBattleConfig::load_from_file(config_path)?;

    // CLI flags override the file
    if let Some(output) = &args.output {
        config.output_path = Some(output.to_string_lossy().into_owned());
    }
    if let Some(seed) = args.seed {
        config.random_seed = Some(seed);
    }
    if let Some(data) = &args.data {
        config.game_data_path = Some(data.to_string_lossy().into_owned());
    }

    run_headless(config)
}

fn run_console_mode(args: &Args) -> Result<(), String> {
    let db = load_database(args)?;
    let settings = GameSettings::load();
    let mut runner = SceneRunner::from_database(&db, &settings.player_trainer, settings.rules)
        .map_err(|e| e.to_string())?;

    let stdin = std::io::stdin();
    let host_rng = GameRng::from_optional_seed(args.seed);
    let mut host = ConsoleHost::new(&db, stdin.lock(), std::io::stdout(), host_rng);
    let mut order_rng = GameRng::from_optional_seed(args.seed.map(|s| s.wrapping_add(1)));

    let history = runner.run(&mut host, &mut order_rng).map_err(|e| e.to_string())?;
    info!("Played {} battles", history.len());
    Ok(())
}

fn run_gui_mode(args: &Args) -> Result<(), String> {
    let db = load_database(args)?;
    let settings = GameSettings::load();
    let trainer = db
        .create_trainer(&settings.player_trainer)
        .ok_or_else(|| format!("Unknown player trainer '{}'", settings.player_trainer))?;

    App::new()
        // Bevy default plugins with the window built from settings
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(settings.primary_window()),
            ..default()
        }))
        .insert_resource(db)
        .insert_resource(settings)
        .insert_resource(PlayerRoster { trainer })
        .insert_resource(GameRng::from_optional_seed(args.seed))
        .add_plugins((EguiPlugin, SettingsPlugin, StatesPlugin))
        // Start in the main menu state
        .init_state::<GameState>()
        .run();

    Ok(())
}
