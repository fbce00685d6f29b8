//! Weapon level to firing pattern
//!
//! Pattern shape is driven by the visual level (weapon level capped at
//! `visual_level_cap`), so projectile count stops growing there. Damage keeps
//! scaling past the cap with no upper bound.

use glam::Vec2;

use super::state::{Agent, Projectile};
use crate::tuning::Tuning;

/// One projectile in a volley, relative to the firing point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub offset_x: f32,
    /// Radians from vertical, positive drifts right
    pub angle: f32,
}

/// Everything fired by a single trigger pull
#[derive(Debug, Clone, PartialEq)]
pub struct FirePattern {
    pub shots: Vec<Shot>,
    pub damage: f32,
}

#[inline]
pub fn visual_level(level: u32, tuning: &Tuning) -> u32 {
    level.min(tuning.visual_level_cap)
}

/// Per-projectile damage: 1 up to the cap, then +1.5 per level beyond it
pub fn shot_damage(level: u32, tuning: &Tuning) -> f32 {
    let beyond = level.saturating_sub(tuning.visual_level_cap);
    1.0 + beyond as f32 * tuning.damage_per_level_beyond_cap
}

pub fn main_stream_count(level: u32, tuning: &Tuning) -> u32 {
    (1 + visual_level(level, tuning) / 3).min(tuning.max_main_streams)
}

pub fn spread_pair_count(level: u32, tuning: &Tuning) -> u32 {
    (visual_level(level, tuning) / 2).min(tuning.max_spread_pairs)
}

/// Projectiles per shot
pub fn projectile_count(level: u32, tuning: &Tuning) -> u32 {
    main_stream_count(level, tuning) + 2 * spread_pair_count(level, tuning)
}

/// Frames between shots, floored at `fire_cooldown_min`
pub fn fire_cooldown(level: u32, tuning: &Tuning) -> u32 {
    let step = level / tuning.levels_per_cooldown_step;
    tuning
        .fire_cooldown_base
        .saturating_sub(step)
        .max(tuning.fire_cooldown_min)
}

pub fn fire_pattern(level: u32, tuning: &Tuning) -> FirePattern {
    let streams = main_stream_count(level, tuning);
    let pairs = spread_pair_count(level, tuning);
    let mut shots = Vec::with_capacity((streams + pairs * 2) as usize);

    // Parallel streams, centered on the nose
    let center = (streams as f32 - 1.0) / 2.0;
    for i in 0..streams {
        shots.push(Shot {
            offset_x: (i as f32 - center) * tuning.stream_spacing,
            angle: 0.0,
        });
    }

    for i in 1..=pairs {
        let angle = tuning.spread_step * i as f32;
        shots.push(Shot {
            offset_x: 0.0,
            angle: -angle,
        });
        shots.push(Shot {
            offset_x: 0.0,
            angle,
        });
    }

    FirePattern {
        shots,
        damage: shot_damage(level, tuning),
    }
}

/// Build the projectiles for one shot from the agent's nose
pub fn fire(agent: &Agent, tuning: &Tuning) -> Vec<Projectile> {
    let pattern = fire_pattern(agent.weapon_level, tuning);
    let nose = agent.nose();
    pattern
        .shots
        .iter()
        .map(|shot| {
            Projectile::new(
                nose + Vec2::new(shot.offset_x, 0.0),
                shot.angle,
                pattern.damage,
                tuning,
            )
        })
        .collect()
}
