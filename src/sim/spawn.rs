//! Spawn pacing and difficulty scaling
//!
//! The director owns a frame counter. Once it passes the current spawn rate it
//! introduces exactly one entity: rarely a natural pickup, otherwise a hostile.

use glam::Vec2;
use rand::Rng;

use super::state::{Hostile, Pickup, PickupKind};
use crate::tuning::Tuning;

/// An entity chosen by the director this frame
#[derive(Debug, Clone)]
pub enum Spawn {
    Hostile(Hostile),
    Pickup(Pickup),
}

/// Frames between spawns: shrinks with difficulty and weapon level, floored at `spawn_rate_min`
pub fn spawn_rate(difficulty: f32, weapon_level: u32, tuning: &Tuning) -> f32 {
    let rate = tuning.spawn_rate_base
        - tuning.spawn_rate_per_difficulty * difficulty
        - tuning.spawn_rate_per_level * weapon_level as f32;
    rate.max(tuning.spawn_rate_min)
}

/// Descent speed from a uniform jitter draw in [0, 1)
pub fn hostile_speed(jitter: f32, difficulty: f32, tuning: &Tuning) -> f32 {
    let speed = jitter * tuning.hostile_speed_jitter
        + tuning.hostile_base_speed
        + difficulty * tuning.hostile_speed_per_difficulty;
    speed.min(tuning.hostile_max_speed)
}

/// Hit points, fixed for the hostile's lifetime
pub fn hostile_hp(difficulty: f32, weapon_level: u32, tuning: &Tuning) -> f32 {
    tuning.hostile_base_hp
        + difficulty * tuning.hostile_hp_per_difficulty
        + weapon_level as f32 * tuning.hostile_hp_per_weapon_level
}

pub fn spawn_hostile<R: Rng>(
    rng: &mut R,
    x: f32,
    difficulty: f32,
    weapon_level: u32,
    tuning: &Tuning,
) -> Hostile {
    let speed = hostile_speed(rng.random::<f32>(), difficulty, tuning);
    let hp = hostile_hp(difficulty, weapon_level, tuning);
    Hostile::new(x, speed, hp, tuning)
}

/// Upgrade probability: generous early, throttled at high levels
pub fn upgrade_chance(weapon_level: u32, tuning: &Tuning) -> f32 {
    if weapon_level <= tuning.early_level {
        tuning.upgrade_chance_early
    } else if weapon_level > tuning.late_level {
        tuning.upgrade_chance_late
    } else {
        tuning.upgrade_chance_mid
    }
}

/// Map a uniform roll in [0, 1) to a pickup kind
pub fn pickup_kind_for_roll(roll: f32, weapon_level: u32, tuning: &Tuning) -> PickupKind {
    let upgrade = upgrade_chance(weapon_level, tuning);
    if roll < upgrade {
        PickupKind::WeaponUpgrade
    } else if roll < upgrade + tuning.shield_chance {
        PickupKind::Shield
    } else {
        PickupKind::Score
    }
}

pub fn spawn_pickup<R: Rng>(rng: &mut R, pos: Vec2, weapon_level: u32, tuning: &Tuning) -> Pickup {
    let kind = pickup_kind_for_roll(rng.random::<f32>(), weapon_level, tuning);
    Pickup::new(pos, kind, tuning)
}

/// Time-based spawn decisions
#[derive(Debug, Clone, Default)]
pub struct SpawnDirector {
    /// Frames since the last spawn
    pub timer: u32,
}

impl SpawnDirector {
    /// Advance one frame, possibly returning a new entity
    pub fn step<R: Rng>(
        &mut self,
        rng: &mut R,
        difficulty: f32,
        weapon_level: u32,
        tuning: &Tuning,
    ) -> Option<Spawn> {
        let rate = spawn_rate(difficulty, weapon_level, tuning);
        let mut spawn = None;

        if self.timer as f32 > rate {
            let x = rng.random::<f32>() * (tuning.playfield_width - tuning.hostile_size);
            spawn = Some(if rng.random::<f32>() < tuning.natural_item_chance {
                let pos = Vec2::new(x, tuning.pickup_spawn_y);
                Spawn::Pickup(spawn_pickup(rng, pos, weapon_level, tuning))
            } else {
                Spawn::Hostile(spawn_hostile(rng, x, difficulty, weapon_level, tuning))
            });
            self.timer = 0;
        }
        self.timer += 1;

        spawn
    }
}
