//! Draw contract for the host renderer
//!
//! The core never touches a graphics API. Every visible entity knows how to
//! append itself to a triangle list of [`Vertex`]es in playfield pixels, and
//! [`build_frame`] assembles a full frame the host can upload as-is.

pub mod shapes;
pub mod vertex;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::palette::{self, to_rgba};
use crate::settings::Settings;
use crate::sim::{Agent, GamePhase, GameState, Hostile, Particle, ParticleKind, Pickup, PickupKind, Projectile, Star};

pub use shapes::CIRCLE_SEGMENTS;
pub use vertex::{Vertex, as_bytes};

/// Nominal frame duration; animation phases are driven by simulated ticks
const FRAME_MS: f32 = 1000.0 / 60.0;

/// Per-frame values shared by every draw call
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    /// Simulated frames since the session started
    pub ticks: u64,
}

impl FrameContext {
    /// Elapsed session time in milliseconds
    pub fn millis(&self) -> f32 {
        self.ticks as f32 * FRAME_MS
    }
}

/// Anything that can render itself into a triangle list
pub trait Draw {
    fn draw(&self, ctx: &FrameContext, out: &mut Vec<Vertex>);
}

impl Draw for Agent {
    fn draw(&self, ctx: &FrameContext, out: &mut Vec<Vertex>) {
        let center = self.center();
        let cyan = to_rgba(palette::CYAN, 1.0);

        // Glow
        shapes::circle(out, center, self.size.x * 0.7, to_rgba(palette::CYAN, 0.15), CIRCLE_SEGMENTS);

        // Hull: nose, two wing tips and a notched tail
        let nose = self.nose();
        let left = Vec2::new(self.pos.x, self.pos.y + self.size.y);
        let right = self.pos + self.size;
        let notch = Vec2::new(center.x, self.pos.y + self.size.y - 8.0);
        shapes::triangle(out, nose, left, notch, cyan);
        shapes::triangle(out, nose, notch, right, cyan);

        if self.shielded {
            let pulse = (ctx.millis() / 100.0).sin().abs();
            shapes::ring(
                out,
                center,
                self.size.x * 0.9,
                2.0,
                to_rgba(palette::WHITE, pulse),
                CIRCLE_SEGMENTS,
            );
        }
    }
}

/// Stronger bullets read hotter
pub fn projectile_color(damage: f32) -> u32 {
    if damage > 5.0 {
        palette::RED
    } else if damage > 2.0 {
        palette::PURPLE
    } else {
        palette::YELLOW
    }
}

impl Draw for Projectile {
    fn draw(&self, _ctx: &FrameContext, out: &mut Vec<Vertex>) {
        shapes::rect(out, self.pos, self.size, to_rgba(projectile_color(self.damage), 1.0));
    }
}

impl Draw for Hostile {
    fn draw(&self, _ctx: &FrameContext, out: &mut Vec<Vertex>) {
        let body = if self.hit_timer > 0 {
            palette::WHITE
        } else {
            self.color
        };
        shapes::rect(out, self.pos, self.size, to_rgba(body, 1.0));
        if self.hit_timer > 0 {
            return;
        }

        // Dark core fades as hp grows so tougher hostiles look brighter
        let core_alpha = 0.5 / (self.hp / 5.0).max(1.0);
        shapes::rect(
            out,
            self.pos + Vec2::splat(5.0),
            self.size - Vec2::splat(10.0),
            [0.0, 0.0, 0.0, core_alpha],
        );
    }
}

impl Draw for Pickup {
    fn draw(&self, ctx: &FrameContext, out: &mut Vec<Vertex>) {
        let center = self.pos + self.size / 2.0;
        let color = to_rgba(self.kind.color(), 1.0);
        let spin = ctx.millis() / 200.0;
        match self.kind {
            PickupKind::WeaponUpgrade => {
                shapes::rotated_square(out, center, self.size.x / 2.0, spin, color);
                shapes::rotated_square(out, center, self.size.x / 4.0, spin, to_rgba(palette::WHITE, 1.0));
            }
            PickupKind::Shield => {
                shapes::circle(out, center, self.size.x / 2.0, color, CIRCLE_SEGMENTS);
            }
            PickupKind::Score => {
                shapes::rotated_square(
                    out,
                    center,
                    self.size.x * 0.4,
                    spin + std::f32::consts::FRAC_PI_4,
                    color,
                );
            }
        }
    }
}

impl Draw for Particle {
    fn draw(&self, _ctx: &FrameContext, out: &mut Vec<Vertex>) {
        let color = to_rgba(self.color, self.life.clamp(0.0, 1.0));
        match self.kind {
            ParticleKind::Spark => {
                shapes::rect(out, self.pos, Vec2::splat(self.size), color);
            }
            ParticleKind::Ring => {
                shapes::ring(out, self.pos, self.size, 3.0, color, CIRCLE_SEGMENTS);
            }
        }
    }
}

impl Draw for Star {
    fn draw(&self, _ctx: &FrameContext, out: &mut Vec<Vertex>) {
        shapes::rect(out, self.pos, Vec2::splat(self.size), to_rgba(palette::WHITE, 1.0));
    }
}

/// Accumulates draw calls for one frame
#[derive(Debug, Clone)]
pub struct DrawList {
    ctx: FrameContext,
    vertices: Vec<Vertex>,
}

impl DrawList {
    pub fn new(ctx: FrameContext) -> Self {
        Self {
            ctx,
            vertices: Vec::new(),
        }
    }

    pub fn push(&mut self, item: &impl Draw) {
        item.draw(&self.ctx, &mut self.vertices);
    }

    pub fn extend<'a, T: Draw + 'a>(&mut self, items: impl IntoIterator<Item = &'a T>) {
        for item in items {
            self.push(item);
        }
    }

    /// Shift everything drawn so far
    pub fn translate(&mut self, offset: Vec2) {
        if offset == Vec2::ZERO {
            return;
        }
        for v in &mut self.vertices {
            v.position[0] += offset.x;
            v.position[1] += offset.y;
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn into_vertices(self) -> Vec<Vertex> {
        self.vertices
    }
}

/// Camera jitter for the current shake intensity. Seeded by the tick so a
/// frame always draws the same way and the simulation RNG is untouched.
pub fn shake_offset(state: &GameState) -> Vec2 {
    if state.screen_shake <= 0.0 {
        return Vec2::ZERO;
    }
    let mut rng = Pcg32::seed_from_u64(state.time_ticks);
    Vec2::new(
        (rng.random::<f32>() - 0.5) * state.screen_shake,
        (rng.random::<f32>() - 0.5) * state.screen_shake,
    )
}

/// Build the full frame in back-to-front order
pub fn build_frame(state: &GameState, settings: &Settings) -> Vec<Vertex> {
    let mut list = DrawList::new(FrameContext {
        ticks: state.time_ticks,
    });

    if settings.starfield {
        list.extend(&state.stars);
    }
    if state.phase != GamePhase::GameOver {
        list.push(&state.agent);
    }
    list.extend(state.projectiles.iter().filter(|p| !p.expired));
    list.extend(state.hostiles.iter().filter(|h| !h.expired));
    list.extend(state.pickups.iter().filter(|p| !p.expired));
    if settings.particles {
        list.extend(state.particles.iter());
    }

    if settings.screen_shake {
        list.translate(shake_offset(state));
    }
    list.into_vertices()
}
