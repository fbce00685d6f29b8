//! Host preferences
//!
//! Persisted separately from tuning as a small JSON file. These never change
//! gameplay; they only affect how the host presents a session.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Visual Effects ===
    /// Screen shake on shielded impacts
    pub screen_shake: bool,
    /// Particle effects (explosions, sparks, rings)
    pub particles: bool,
    /// Background starfield
    pub starfield: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_shake: true,
            particles: true,
            starfield: true,

            show_fps: false,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("Ignoring malformed settings {}: {}", path.display(), err);
                    Self::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(err) => {
                log::warn!("Cannot read settings {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
