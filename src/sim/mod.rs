//! Frame-driven simulation module
//!
//! All gameplay logic lives here. This module must stay free of platform code:
//! - One `tick` per frame, driven by whatever scheduler the host uses
//! - Seeded RNG only
//! - Collections iterate in spawn order
//! - No rendering or audio dependencies; collaborators consume `GameEvent`s

pub mod collision;
pub mod input;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod weapon;

pub use collision::{Aabb, overlaps_with_tolerance};
pub use input::{PointerState, TickInput, autopilot};
pub use spawn::{Spawn, SpawnDirector, spawn_rate};
pub use state::{
    Agent, GameEvent, GamePhase, GameState, Hostile, MAX_BURST, Particle, ParticleKind,
    ParticleSystem, Pickup, PickupKind, Projectile, SoundEffect, Star,
};
pub use tick::tick;
pub use weapon::{FirePattern, Shot, fire_pattern, projectile_count, shot_damage};
