//! Game configuration loaded from an external RON file.
//!
//! Lets key bindings and tuning values change without recompilation.

use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

/// Default location of the config file, relative to the working directory.
pub const CONFIG_PATH: &str = "res/config.ron";

/// Key bindings for gameplay.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub forward: KeyCode,
    pub backward: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub jump: KeyCode,
    pub pause: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            backward: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            jump: KeyCode::Space,
            pause: KeyCode::Escape,
        }
    }
}

/// Global configuration resource.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Root directory holding StageData/, ObjectData/, SoundData/ and UI/.
    pub resource_root: PathBuf,
    /// Level loaded when entering the game.
    pub start_level: String,
    pub window_title: String,
    pub resolution: (f32, f32),
    pub keys: KeyBindings,
    // Camera
    pub mouse_sensitivity: f32,
    pub camera_distance: f32,
    pub camera_min_distance: f32,
    pub camera_max_distance: f32,
    // Movement
    pub move_speed: f32,
    pub jump_force: f32,
    pub gravity: f32,
    /// Scales every volume passed to the audio manager.
    pub master_volume: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            resource_root: PathBuf::from("res"),
            start_level: "TestLevel000".to_string(),
            window_title: "Outrospection".to_string(),
            resolution: (1280.0, 720.0),
            keys: KeyBindings::default(),
            mouse_sensitivity: 1.5,
            camera_distance: 5.0,
            camera_min_distance: 1.5,
            camera_max_distance: 12.0,
            move_speed: 5.0,
            jump_force: 6.0,
            gravity: 15.0,
            master_volume: 1.0,
        }
    }
}

impl GameConfig {
    /// Load from [`CONFIG_PATH`], falling back to defaults.
    /// Load from [`CONFIG_PATH`], falling back to defaults.
    pub fn load() -> (Self, ConfigReport) {
        Self::load_from(Path::new(CONFIG_PATH))
    }

    /// Load from `path`, falling back to defaults. The report says what happened.
    pub fn load_from(path: &Path) -> (Self, ConfigReport) {
        let (config, error) = match Self::read(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        };
        let report = ConfigReport {
            path: path.to_path_buf(),
            error,
        };
        (config, report)
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Errors reading the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Outcome of loading the config, kept until logging is up.
#[derive(Resource, Debug)]
pub struct ConfigReport {
    pub path: PathBuf,
    pub error: Option<ConfigError>,
}

impl ConfigReport {
    pub fn used_defaults(&self) -> bool {
        self.error.is_some()
    }
}

/// Startup system: log how the config was obtained.
pub fn log_config_report(report: Option<Res<ConfigReport>>) {
    let Some(report) = report else {
        return;
    };
    match &report.error {
        None => info!("Loaded game config from {:?}", report.path),
        Some(e @ ConfigError::Read { .. }) => warn!("{}. Using defaults.", e),
        Some(e @ ConfigError::Parse { .. }) => error!("{}. Using defaults.", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let (config, report) = GameConfig::load_from(Path::new("definitely/not/here.ron"));
        assert!(matches!(report.error, Some(ConfigError::Read { .. })));
        assert_eq!(config.start_level, "TestLevel000");
        assert_eq!(config.keys.pause, KeyCode::Escape);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "(start_level: \"Octopus\", move_speed: 7.5, keys: (jump: KeyJ))"
        )
        .unwrap();

        let (config, report) = GameConfig::load_from(file.path());
        assert!(!report.used_defaults());
        assert_eq!(config.start_level, "Octopus");
        assert_eq!(config.move_speed, 7.5);
        assert_eq!(config.keys.jump, KeyCode::KeyJ);
        assert_eq!(config.keys.forward, KeyCode::KeyW);
        assert_eq!(config.resource_root, PathBuf::from("res"));
    }

    #[test]
    fn test_invalid_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not ron").unwrap();
        let (config, report) = GameConfig::load_from(file.path());
        assert!(matches!(report.error, Some(ConfigError::Parse { .. })));
        assert_eq!(config.window_title, "Outrospection");
    }
}
