//! Game settings and preferences
//!
//! Audio preferences and the slot allocation policy persist between runs.
//! Difficulty is chosen on the options screen each session and is never
//! saved.

use serde::{Deserialize, Serialize};

use crate::error::StartupError;
use crate::sim::{AllocPolicy, Difficulty};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Selected on the options screen; resets every launch
    #[serde(skip)]
    pub difficulty: Difficulty,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Simulation ===
    /// How entity slots are reused
    pub store_policy: AllocPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),

            // Audio
            master_volume: 0.8,
            music_volume: 0.7,
            sfx_volume: 1.0,
            muted: false,

            store_policy: AllocPolicy::default(),
        }
    }
}

impl Settings {
    /// Environment variable naming a JSON settings file (native only)
    pub const PATH_ENV: &'static str = "SPACE_RAIDER_SETTINGS";

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "space_raider_settings";

    pub fn from_json(json: &str) -> Result<Self, StartupError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, StartupError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Music volume after master volume and mute
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.music_volume).clamp(0.0, 1.0)
        }
    }

    /// Effect volume after master volume and mute
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Load settings from LocalStorage (WASM only). A corrupt entry is
    /// replaced by defaults rather than blocking startup.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Result<Self, StartupError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return Ok(settings);
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Ok(Self::default())
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from the file named by [`Self::PATH_ENV`], or defaults
    /// when it is unset
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self, StartupError> {
        let Some(path) = std::env::var_os(Self::PATH_ENV) else {
            log::info!("Using default settings");
            return Ok(Self::default());
        };

        let json = std::fs::read_to_string(&path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.to_string_lossy());
        Ok(settings)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_is_not_persisted() {
        let settings = Settings {
            difficulty: Difficulty::Hard,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert!(!json.contains("difficulty"));

        let loaded = Settings::from_json(&json).unwrap();
        assert_eq!(loaded.difficulty, Difficulty::Easy);
        assert_eq!(loaded.master_volume, settings.master_volume);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let loaded = Settings::from_json(r#"{ "muted": true }"#).unwrap();
        assert!(loaded.muted);
        assert_eq!(loaded.store_policy, AllocPolicy::RoundRobin);
        assert_eq!(loaded.sfx_volume, 1.0);
    }

    #[test]
    fn test_store_policy_parses() {
        let loaded = Settings::from_json(r#"{ "store_policy": "PreferInactive" }"#).unwrap();
        assert_eq!(loaded.store_policy, AllocPolicy::PreferInactive);
    }

    #[test]
    fn test_malformed_json_is_a_settings_error() {
        let err = Settings::from_json("{ muted: yes").unwrap_err();
        assert!(matches!(err, StartupError::Settings(_)));
    }

    #[test]
    fn test_mute_silences_everything() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        assert_eq!(settings.effective_music_volume(), 0.0);
        assert_eq!(settings.effective_sfx_volume(), 0.0);

        let loud = Settings::default();
        assert!((loud.effective_sfx_volume() - 0.8).abs() < 1e-6);
    }
}
