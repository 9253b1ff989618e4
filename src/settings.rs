//! Game settings and preferences
//!
//! Persisted as JSON separately from game saves. Environment variables
//! override the file when loading through [`Settings::load_or_default`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::TICKS_PER_SECOND;
use crate::error::Result;
use crate::save::Difficulty;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simulation rate in Hz
    pub tick_rate_hz: u32,

    // === Visual Effects ===
    /// Screen shake on explosions
    pub screen_shake: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (disables shake)
    pub reduced_motion: bool,

    // === Game ===
    /// Directory holding one JSON file per save
    pub save_dir: PathBuf,
    /// Difficulty used for new games
    pub default_difficulty: Difficulty,
    /// Fixed RNG seed, random when unset
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_rate_hz: TICKS_PER_SECOND,

            screen_shake: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            reduced_motion: false,

            save_dir: PathBuf::from("saves"),
            default_difficulty: Difficulty::Normal,
            seed: None,
        }
    }
}

impl Settings {
    /// Environment variable overriding `save_dir`
    pub const ENV_SAVE_DIR: &'static str = "TENEBRIS_SAVE_DIR";
    /// Environment variable overriding `muted` ("1"/"true" mutes)
    pub const ENV_MUTED: &'static str = "TENEBRIS_MUTED";
    /// Environment variable overriding `seed`
    pub const ENV_SEED: &'static str = "TENEBRIS_SEED";

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Read settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults, then apply environment overrides
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let mut settings = match path {
            Some(path) if path.exists() => Self::load(path).unwrap_or_else(|e| {
                log::warn!("Invalid settings file {}: {}", path.display(), e);
                Self::default()
            }),
            Some(path) => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };
        settings.apply_overrides(|key| std::env::var(key).ok());
        settings
    }

    /// Apply overrides looked up by variable name
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(Self::ENV_SAVE_DIR).filter(|d| !d.is_empty()) {
            self.save_dir = PathBuf::from(dir);
        }
        if let Some(muted) = lookup(Self::ENV_MUTED) {
            self.muted = matches!(muted.to_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
        if let Some(seed) = lookup(Self::ENV_SEED) {
            match seed.parse() {
                Ok(seed) => self.seed = Some(seed),
                Err(_) => log::warn!("Ignoring {}={:?}: not a number", Self::ENV_SEED, seed),
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        let settings = Settings {
            screen_shake: false,
            sfx_volume: 0.5,
            default_difficulty: Difficulty::Heartless,
            seed: Some(99),
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "muted": true }"#).unwrap();
        let settings = Settings::load(&path).unwrap();
        assert!(settings.muted);
        assert_eq!(settings.tick_rate_hz, TICKS_PER_SECOND);
        assert!(settings.screen_shake);
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();
        assert!(Settings::load(&path).is_err());
        let settings = Settings::load_or_default(Some(&path));
        assert_eq!(settings.tick_rate_hz, TICKS_PER_SECOND);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            (Settings::ENV_SAVE_DIR, "/tmp/tenebris"),
            (Settings::ENV_MUTED, "TRUE"),
            (Settings::ENV_SEED, "1234"),
        ]
        .into_iter()
        .collect();
        let mut settings = Settings::default();
        settings.apply_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(settings.save_dir, PathBuf::from("/tmp/tenebris"));
        assert!(settings.muted);
        assert_eq!(settings.seed, Some(1234));
    }

    #[test]
    fn test_bad_seed_override_is_ignored() {
        let mut settings = Settings::default();
        settings.apply_overrides(|key| (key == Settings::ENV_SEED).then(|| "abc".to_string()));
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn test_reduced_motion_disables_shake() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert!(!settings.effective_screen_shake());
    }
}
