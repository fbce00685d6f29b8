//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. A session takes an immutable copy at
//! construction, so tests can override any value without touching globals.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gameplay constants (units are pixels and frames)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,

    // === Player ===
    pub player_size: f32,
    pub player_speed: f32,
    /// Max speed while the focus action is held
    pub player_focus_speed: f32,
    /// Velocity multiplier per frame with no direction held
    pub player_friction: f32,
    /// Speeds below this snap to zero
    pub velocity_snap: f32,
    /// Fraction of the remaining distance covered per frame in pointer mode
    pub pointer_ease: f32,
    /// Start position distance from the bottom edge
    pub player_start_offset: f32,
    pub shield_ticks: u32,

    // === Weapon ===
    pub projectile_width: f32,
    pub projectile_height: f32,
    pub projectile_speed: f32,
    /// Horizontal drift per radian of firing angle
    pub projectile_drift_factor: f32,
    pub stream_spacing: f32,
    pub visual_level_cap: u32,
    pub damage_per_level_beyond_cap: f32,
    pub max_main_streams: u32,
    pub max_spread_pairs: u32,
    pub spread_step: f32,
    pub fire_cooldown_base: u32,
    pub fire_cooldown_min: u32,
    pub levels_per_cooldown_step: u32,

    // === Hostiles ===
    pub hostile_size: f32,
    pub hostile_spawn_y: f32,
    pub hostile_base_speed: f32,
    pub hostile_speed_jitter: f32,
    pub hostile_speed_per_difficulty: f32,
    pub hostile_max_speed: f32,
    pub hostile_base_hp: f32,
    pub hostile_hp_per_difficulty: f32,
    pub hostile_hp_per_weapon_level: f32,
    pub hit_flash_ticks: u32,
    pub kill_score_base: u64,
    pub kill_score_per_level: u64,

    // === Pickups ===
    pub pickup_size: f32,
    pub pickup_spawn_y: f32,
    pub pickup_speed: f32,
    pub pickup_score: u64,
    pub drop_rate_on_kill: f32,
    pub natural_item_chance: f32,
    pub upgrade_chance_early: f32,
    pub upgrade_chance_mid: f32,
    pub upgrade_chance_late: f32,
    /// Weapon levels at or below this use the early upgrade chance
    pub early_level: u32,
    /// Weapon levels above this use the late upgrade chance
    pub late_level: u32,
    pub shield_chance: f32,

    // === Spawning & difficulty ===
    pub spawn_rate_base: f32,
    pub spawn_rate_per_difficulty: f32,
    pub spawn_rate_per_level: f32,
    pub spawn_rate_min: f32,
    pub difficulty_start: f32,
    pub difficulty_per_tick: f32,

    // === Collision tolerances ===
    /// Hostile box growth when tested against projectiles
    pub hostile_hitbox_expand: f32,
    /// Hostile box growth when tested against the player
    pub contact_hostile_expand: f32,
    /// Player box shrink when tested against hostiles
    pub player_hitbox_shrink: f32,
    /// Pickup box growth when tested against the player
    pub pickup_hitbox_expand: f32,

    // === Effects ===
    pub max_particles: usize,
    pub star_count: usize,
    pub shield_hit_shake: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            playfield_width: 800.0,
            playfield_height: 600.0,

            player_size: 36.0,
            player_speed: 2.5,
            player_focus_speed: 2.0,
            player_friction: 0.85,
            velocity_snap: 0.1,
            pointer_ease: 0.2,
            player_start_offset: 100.0,
            shield_ticks: 300,

            projectile_width: 6.0,
            projectile_height: 14.0,
            projectile_speed: 12.0,
            projectile_drift_factor: 5.0,
            stream_spacing: 8.0,
            visual_level_cap: 12,
            damage_per_level_beyond_cap: 1.5,
            max_main_streams: 3,
            max_spread_pairs: 5,
            spread_step: 0.1,
            fire_cooldown_base: 10,
            fire_cooldown_min: 6,
            levels_per_cooldown_step: 5,

            hostile_size: 30.0,
            hostile_spawn_y: -40.0,
            hostile_base_speed: 0.6,
            hostile_speed_jitter: 0.3,
            hostile_speed_per_difficulty: 0.1,
            hostile_max_speed: 3.5,
            hostile_base_hp: 3.0,
            hostile_hp_per_difficulty: 1.5,
            hostile_hp_per_weapon_level: 2.0,
            hit_flash_ticks: 3,
            kill_score_base: 10,
            kill_score_per_level: 2,

            pickup_size: 18.0,
            pickup_spawn_y: -30.0,
            pickup_speed: 1.2,
            pickup_score: 5,
            drop_rate_on_kill: 0.25,
            natural_item_chance: 0.05,
            upgrade_chance_early: 0.6,
            upgrade_chance_mid: 0.3,
            upgrade_chance_late: 0.15,
            early_level: 5,
            late_level: 15,
            shield_chance: 0.1,

            spawn_rate_base: 120.0,
            spawn_rate_per_difficulty: 2.0,
            spawn_rate_per_level: 4.0,
            spawn_rate_min: 15.0,
            difficulty_start: 1.0,
            difficulty_per_tick: 0.0002,

            hostile_hitbox_expand: 10.0,
            contact_hostile_expand: 0.0,
            player_hitbox_shrink: 8.0,
            pickup_hitbox_expand: 5.0,

            max_particles: 80,
            star_count: 60,
            shield_hit_shake: 5.0,
        }
    }
}

/// Errors raised while loading a [`Tuning`] file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Difficulty after `ticks` frames. Derived from the frame count so the step
    /// stays exact however long a session runs.
    pub fn difficulty_at(&self, ticks: u64) -> f32 {
        (self.difficulty_start as f64 + ticks as f64 * self.difficulty_per_tick as f64) as f32
    }

    /// Reject values that would make the simulation degenerate
    pub fn validate(&self) -> Result<(), TuningError> {
        let sizes = [
            ("player_size", self.player_size),
            ("hostile_size", self.hostile_size),
            ("pickup_size", self.pickup_size),
        ];
        for (name, size) in sizes {
            if !(size > 0.0 && size < self.playfield_width && size < self.playfield_height) {
                return Err(TuningError::Invalid(format!(
                    "{name} {size} must be positive and fit the {}x{} playfield",
                    self.playfield_width, self.playfield_height
                )));
            }
        }
        if self.max_particles == 0 {
            return Err(TuningError::Invalid("max_particles must be at least 1".to_string()));
        }
        if self.visual_level_cap == 0 {
            return Err(TuningError::Invalid("visual_level_cap must be at least 1".to_string()));
        }
        if self.levels_per_cooldown_step == 0 {
            return Err(TuningError::Invalid(
                "levels_per_cooldown_step must be at least 1".to_string(),
            ));
        }
        if self.spawn_rate_min < 1.0 {
            return Err(TuningError::Invalid("spawn_rate_min must be at least 1".to_string()));
        }
        let chances = [
            self.drop_rate_on_kill,
            self.natural_item_chance,
            self.upgrade_chance_early,
            self.upgrade_chance_mid,
            self.upgrade_chance_late,
            self.shield_chance,
        ];
        if chances.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err(TuningError::Invalid("probabilities must be within [0, 1]".to_string()));
        }
        Ok(())
    }
}
