//! Axis-aligned collision tests
//!
//! Every pair test takes a tolerance per box: positive grows the box outward,
//! negative shrinks it. The player hitbox is shrunk and hostile hitboxes are
//! grown so near misses feel fair to the player.

use glam::Vec2;

/// Axis-aligned box with a top-left origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Grow (positive) or shrink (negative) the box on every side
    #[inline]
    pub fn inflate(&self, amount: f32) -> Self {
        Self {
            pos: self.pos - Vec2::splat(amount),
            size: self.size + Vec2::splat(amount * 2.0),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    /// Strict overlap; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.pos.x < b_max.x && a_max.x > other.pos.x && self.pos.y < b_max.y && a_max.y > other.pos.y
    }
}

/// Overlap test with an independent tolerance on each box
#[inline]
pub fn overlaps_with_tolerance(a: Aabb, a_tolerance: f32, b: Aabb, b_tolerance: f32) -> bool {
    a.inflate(a_tolerance).overlaps(&b.inflate(b_tolerance))
}
