//! Game settings and preferences
//!
//! Read from a JSON file next to the leaderboard, then overridden from the
//! environment.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Default settings file name
pub const SETTINGS_FILE: &str = "centipede.json";

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    /// IO error reading or writing the settings file
    #[error("settings IO error: {0}")]
    Io(#[from] io::Error),

    /// Settings file is not valid JSON for [`Settings`]
    #[error("settings parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,

    // === Persistence ===
    /// Line-per-score leaderboard file
    pub leaderboard_path: PathBuf,

    // === Session ===
    /// RNG seed; derived from the system time when absent
    pub seed: Option<u64>,
    /// Pace the loop at 30 Hz wall-clock; otherwise run as fast as possible
    pub realtime: bool,
    /// Rounds the headless autopilot plays before quitting
    pub demo_rounds: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,

            leaderboard_path: PathBuf::from("leaderboard.txt"),

            seed: None,
            realtime: true,
            demo_rounds: 1,
        }
    }
}

impl Settings {
    /// Load settings from `path`; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        let mut settings: Settings = serde_json::from_str(&json)?;
        settings.clamp_volumes();
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load from `path` and the environment, falling back to defaults when
    /// the file can't be read
    pub fn load_or_default(path: &Path) -> Self {
        let mut settings = Self::load(path).unwrap_or_else(|e| {
            log::warn!("Unreadable settings {}: {}, using defaults", path.display(), e);
            Self::default()
        });
        settings.apply_env_overrides();
        settings
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Apply `CENTIPEDE_*` environment variables
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup; invalid values keep the current one
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(seed) = lookup("CENTIPEDE_SEED") {
            if let Ok(parsed) = seed.parse::<u64>() {
                self.seed = Some(parsed);
            } else {
                log::warn!("Invalid CENTIPEDE_SEED '{}', using default", seed);
            }
        }

        if let Some(path) = lookup("CENTIPEDE_LEADERBOARD") {
            if path.is_empty() {
                log::warn!("CENTIPEDE_LEADERBOARD is empty, using default");
            } else {
                self.leaderboard_path = PathBuf::from(path);
            }
        }

        if let Some(realtime) = lookup("CENTIPEDE_REALTIME") {
            match realtime.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.realtime = true,
                "0" | "false" | "no" | "off" => self.realtime = false,
                _ => log::warn!("Invalid CENTIPEDE_REALTIME '{}', using default", realtime),
            }
        }

        if let Some(rounds) = lookup("CENTIPEDE_DEMO_ROUNDS") {
            if let Ok(parsed) = rounds.parse::<u32>() {
                self.demo_rounds = parsed;
            } else {
                log::warn!("Invalid CENTIPEDE_DEMO_ROUNDS '{}', using default", rounds);
            }
        }
    }

    /// Configured seed, or one derived from the system time
    pub fn resolved_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        })
    }

    fn clamp_volumes(&mut self) {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.leaderboard_path, PathBuf::from("leaderboard.txt"));
        assert_eq!(settings.demo_rounds, 1);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        let settings = Settings {
            seed: Some(1234),
            realtime: false,
            muted: true,
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_partial_file_and_clamping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, r#"{ "master_volume": 3.5, "demo_rounds": 4 }"#).unwrap();
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.demo_rounds, 4);
        assert!(settings.realtime);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "not json").unwrap();
        assert!(matches!(Settings::load(&path), Err(SettingsError::Json(_))));
        assert_eq!(Settings::load_or_default(&path).master_volume, 0.8);
    }

    #[test]
    fn test_overrides() {
        let mut settings = Settings::default();
        settings.apply_overrides(env(&[
            ("CENTIPEDE_SEED", "42"),
            ("CENTIPEDE_LEADERBOARD", "/tmp/scores.txt"),
            ("CENTIPEDE_REALTIME", "off"),
            ("CENTIPEDE_DEMO_ROUNDS", "3"),
        ]));
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.resolved_seed(), 42);
        assert_eq!(settings.leaderboard_path, PathBuf::from("/tmp/scores.txt"));
        assert!(!settings.realtime);
        assert_eq!(settings.demo_rounds, 3);
    }

    #[test]
    fn test_invalid_overrides_keep_values() {
        let mut settings = Settings::default();
        settings.apply_overrides(env(&[
            ("CENTIPEDE_SEED", "-1"),
            ("CENTIPEDE_REALTIME", "maybe"),
            ("CENTIPEDE_DEMO_ROUNDS", "many"),
        ]));
        assert_eq!(settings, Settings::default());
    }
}
