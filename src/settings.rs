//! Player preferences
//!
//! Persisted separately from leaderboard data in LocalStorage.

use rand::distr::{Alphanumeric, SampleString};
use serde::{Deserialize, Serialize};

use crate::leaderboard::PlayerIdentity;
use crate::sim::OptionsPatch;

/// Which leaderboard backend submissions go to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendChoice {
    #[default]
    Local,
    Remote,
}

impl BackendChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendChoice::Local => "local",
            BackendChoice::Remote => "remote",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "local" => Some(BackendChoice::Local),
            "remote" => Some(BackendChoice::Remote),
            _ => None,
        }
    }
}

/// Persisted player preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Display name for the leaderboard, trimmed to 16 chars
    pub player_name: String,
    /// Stable anonymous id for best-score dedupe, generated once
    pub uid: String,
    /// Leaderboard backend
    pub backend: BackendChoice,

    // Physics defaults applied on boot
    pub ultra_physics: bool,
    pub walls_bounce: bool,
    pub time_dilation: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: String::new(),
            uid: generate_uid(),
            backend: BackendChoice::Local,
            ultra_physics: true,
            walls_bounce: true,
            time_dilation: true,
        }
    }
}

/// Random 16-char alphanumeric id
fn generate_uid() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), 16)
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "graviscore_settings";
    /// Leaderboard name length cap
    pub const NAME_MAX: usize = 16;

    /// Player identity for score submissions; empty names submit as anonymous
    pub fn identity(&self) -> PlayerIdentity {
        let name = self.player_name.trim();
        let name = if name.is_empty() {
            None
        } else {
            Some(name.chars().take(Self::NAME_MAX).collect())
        };
        PlayerIdentity::new(self.uid.clone(), name)
    }

    /// The physics flags as an options patch for the engine
    pub fn physics_options(&self) -> OptionsPatch {
        OptionsPatch {
            ultra_physics: Some(self.ultra_physics),
            walls_bounce: Some(self.walls_bounce),
            time_dilation: Some(self.time_dilation),
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
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

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
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
    fn test_uid_generated_once_per_default() {
        let a = Settings::default();
        let b = Settings::default();
        assert_eq!(a.uid.len(), 16);
        assert_ne!(a.uid, b.uid);
    }

    #[test]
    fn test_identity_trims_and_caps_name() {
        let mut settings = Settings::default();
        settings.player_name = "  a very long player name indeed  ".into();
        let identity = settings.identity();
        assert_eq!(identity.name.as_deref(), Some("a very long play"));

        settings.player_name = "   ".into();
        assert!(settings.identity().name.is_none());
    }

    #[test]
    fn test_backend_parse() {
        assert_eq!(BackendChoice::from_str("LOCAL"), Some(BackendChoice::Local));
        assert_eq!(BackendChoice::from_str("remote"), Some(BackendChoice::Remote));
        assert_eq!(BackendChoice::from_str("sheets"), None);
    }

    #[test]
    fn test_physics_options_patch() {
        let mut settings = Settings::default();
        settings.walls_bounce = false;
        let patch = settings.physics_options();
        assert_eq!(patch.walls_bounce, Some(false));
        assert_eq!(patch.ultra_physics, Some(true));
    }
}
