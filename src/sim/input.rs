//! Per-tick input snapshot and demo autopilot

use glam::Vec2;

use super::state::GameState;

/// Pointer position in playfield coordinates plus button state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
    pub down: bool,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub shoot: bool,
    /// Slower, precise movement
    pub focus: bool,
    /// When set, pointer mode drives the ship for this tick
    pub pointer: Option<PointerState>,
    /// Pause toggle
    pub pause: bool,
    /// Start or restart from the title / game over screen
    pub start: bool,
    /// Demo mode - autopilot flies the ship
    pub idle_mode: bool,
}

impl TickInput {
    /// Raw keyboard direction (not normalized)
    pub fn direction(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        dir
    }

    pub fn wants_fire(&self) -> bool {
        self.shoot || self.pointer.is_some_and(|p| p.down)
    }
}

/// Horizontal distance at which a descending hostile counts as a threat
const THREAT_LANE: f32 = 50.0;
/// How far above the ship the autopilot looks for threats
const THREAT_RANGE: f32 = 220.0;

/// Fill keyboard actions for demo mode: dodge the nearest threat, otherwise
/// chase a pickup or line up under the lowest hostile. Always shoots.
pub fn autopilot(state: &GameState, input: &mut TickInput) {
    let agent = &state.agent;
    let center = agent.center();
    let tuning = &state.tuning;

    input.pointer = None;
    input.shoot = true;
    input.focus = false;
    input.left = false;
    input.right = false;
    input.up = false;
    input.down = false;

    let threat = state
        .hostiles
        .iter()
        .filter(|h| {
            let dx = (h.center().x - center.x).abs();
            let above = agent.pos.y - (h.pos.y + h.size.y);
            dx < THREAT_LANE && above < THREAT_RANGE && h.pos.y < agent.pos.y + agent.size.y
        })
        .max_by(|a, b| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let target_x = if let Some(hostile) = threat {
        // Dodge toward the side with more room
        let room_left = center.x;
        let room_right = tuning.playfield_width - center.x;
        if hostile.center().x >= center.x && room_left > agent.size.x {
            Some(center.x - THREAT_LANE * 2.0)
        } else if room_right > agent.size.x {
            Some(center.x + THREAT_LANE * 2.0)
        } else {
            Some(center.x - THREAT_LANE * 2.0)
        }
    } else if let Some(pickup) = state.pickups.iter().min_by(|a, b| {
        a.pos
            .distance_squared(center)
            .partial_cmp(&b.pos.distance_squared(center))
            .unwrap_or(std::cmp::Ordering::Equal)
    }) {
        Some(pickup.pos.x + pickup.size.x / 2.0)
    } else {
        state
            .hostiles
            .iter()
            .max_by(|a, b| {
                a.pos
                    .y
                    .partial_cmp(&b.pos.y)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|h| h.center().x)
    };

    if let Some(target_x) = target_x {
        let dx = target_x - center.x;
        if dx < -tuning.player_speed {
            input.left = true;
        } else if dx > tuning.player_speed {
            input.right = true;
        }
    }

    // Hold the starting row
    let home_y = tuning.playfield_height - tuning.player_start_offset;
    if agent.pos.y < home_y - tuning.player_speed {
        input.down = true;
    } else if agent.pos.y > home_y + tuning.player_speed {
        input.up = true;
    }
}
