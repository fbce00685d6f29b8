//! Neon Apex - A vertical arcade shooter
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (entities, collisions, spawning, weapons)
//! - `renderer`: Draw contract producing vertex lists for the host
//! - `audio`: Rate-limited sound dispatch for simulation events
//! - `tuning`: Data-driven game balance
//! - `ui`: HUD state fed by simulation events

pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Packed RGB colors shared by the simulation and the renderer
pub mod palette {
    pub const HOSTILE: u32 = 0xFF0033;
    pub const WHITE: u32 = 0xFFFFFF;
    pub const CYAN: u32 = 0x00FFFF;
    pub const PURPLE: u32 = 0xDD00FF;
    pub const YELLOW: u32 = 0xFFFF00;
    pub const TEAL: u32 = 0x00AAAA;
    pub const RED: u32 = 0xFF0033;

    /// Unpack a 0xRRGGBB color into normalized RGBA
    #[inline]
    pub fn to_rgba(color: u32, alpha: f32) -> [f32; 4] {
        let r = ((color >> 16) & 0xFF) as f32 / 255.0;
        let g = ((color >> 8) & 0xFF) as f32 / 255.0;
        let b = (color & 0xFF) as f32 / 255.0;
        [r, g, b, alpha]
    }
}
