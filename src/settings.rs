//! Game settings and configuration
//!
//! Window preferences plus the battle rules and player trainer used by the
//! graphical and console modes. Persisted as RON next to the executable.

use bevy::prelude::*;
use bevy::window::{MonitorSelection, PresentMode, PrimaryWindow, WindowMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::battle::BattleRules;

/// User-configurable game settings
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    pub window_mode: WindowModeOption,
    pub resolution: ResolutionOption,
    pub vsync: bool,
    /// Rules applied to every interactive battle
    #[serde(default)]
    pub rules: BattleRules,
    /// Trainer prototype id the player battles as
    #[serde(default = "default_player_trainer")]
    pub player_trainer: String,
}

fn default_player_trainer() -> String {
    "player".to_string()
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            window_mode: WindowModeOption::Windowed,
            resolution: ResolutionOption::HD720,
            vsync: true,
            rules: BattleRules::default(),
            player_trainer: default_player_trainer(),
        }
    }
}

impl GameSettings {
    /// Get the path to the settings file
    pub fn settings_path() -> PathBuf {
        PathBuf::from("settings.ron")
    }

    /// Load settings from the default file, or return defaults
    pub fn load() -> Self {
        Self::load_from(&Self::settings_path())
    }

    /// Load settings from `path`, or return defaults if it is missing or broken
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(contents) => match ron::from_str(&contents) {
                    Ok(settings) => {
                        info!("Loaded settings from {:?}", path);
                        settings
                    }
                    Err(e) => {
                        warn!("Failed to parse settings file: {}", e);
                        Self::default()
                    }
                },
                Err(e) => {
                    warn!("Failed to read settings file: {}", e);
                    Self::default()
                }
            }
        } else {
            info!("No settings file found, using defaults");
            Self::default()
        }
    }

    /// Save settings to the default file
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to(&Self::settings_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let contents = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, contents)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }

    pub fn primary_window(&self) -> Window {
        let (width, height) = self.resolution.dimensions();
        Window {
            title: "Battler".to_string(),
            resolution: (width, height).into(),
            mode: self.window_mode.to_bevy(),
            present_mode: present_mode(self.vsync),
            resizable: true,
            ..default()
        }
    }
}

fn present_mode(vsync: bool) -> PresentMode {
    if vsync {
        PresentMode::AutoVsync
    } else {
        PresentMode::AutoNoVsync
    }
}

/// Window mode options for the UI
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowModeOption {
    Windowed,
    BorderlessFullscreen,
}

impl WindowModeOption {
    pub fn to_bevy(&self) -> WindowMode {
        match self {
            WindowModeOption::Windowed => WindowMode::Windowed,
            WindowModeOption::BorderlessFullscreen => {
                WindowMode::BorderlessFullscreen(MonitorSelection::Current)
            }
        }
    }
}

/// Resolution presets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionOption {
    HD720,
    HD1080,
    QHD1440,
}

impl ResolutionOption {
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            ResolutionOption::HD720 => (1280.0, 720.0),
            ResolutionOption::HD1080 => (1920.0, 1080.0),
            ResolutionOption::QHD1440 => (2560.0, 1440.0),
        }
    }
}

/// Plugin for managing game settings
///
/// Expects `GameSettings` to be inserted before the plugin so the window can
/// be built from it.
pub struct SettingsPlugin;

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameSettings>()
            .add_systems(Update, (save_settings_on_change, apply_runtime_settings));
    }
}

/// System to save settings when they change
fn save_settings_on_change(settings: Res<GameSettings>) {
    if settings.is_changed() && !settings.is_added() {
        if let Err(e) = settings.save() {
            error!("Failed to save settings: {}", e);
        } else {
            info!("Settings changed: {:?}", settings.rules);
        }
    }
}

/// System to apply settings that can be changed at runtime
/// Currently handles: VSync
fn apply_runtime_settings(
    settings: Res<GameSettings>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    if settings.is_changed() && !settings.is_added() {
        if let Ok(mut window) = windows.get_single_mut() {
            let mode = present_mode(settings.vsync);
            if window.present_mode != mode {
                window.present_mode = mode;
                info!("Applied VSync: {}", settings.vsync);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::DamageFloor;

    #[test]
    fn test_old_settings_file_gets_rule_defaults() {
        let settings: GameSettings =
            ron::from_str("(window_mode: Windowed, resolution: HD1080, vsync: false)").unwrap();
        assert_eq!(settings.resolution, ResolutionOption::HD1080);
        assert_eq!(settings.rules, BattleRules::default());
        assert_eq!(settings.player_trainer, "player");
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("battler_settings_{}.ron", std::process::id()));
        let mut settings = GameSettings::default();
        settings.rules.damage_floor = DamageFloor::One;
        settings.rules.reset_hp_on_exit = false;
        settings.save_to(&path).unwrap();

        let loaded = GameSettings::load_from(&path);
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let loaded = GameSettings::load_from(Path::new("no/such/settings.ron"));
        assert_eq!(loaded, GameSettings::default());
    }
}
