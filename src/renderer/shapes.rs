//! Shape generation for 2D primitives
//!
//! Every primitive appends a triangle list to `out`.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Segments used for round shapes
pub const CIRCLE_SEGMENTS: u32 = 16;

/// Axis-aligned filled rectangle
pub fn rect(out: &mut Vec<Vertex>, pos: Vec2, size: Vec2, color: [f32; 4]) {
    let max = pos + size;
    out.push(Vertex::new(pos.x, pos.y, color));
    out.push(Vertex::new(max.x, pos.y, color));
    out.push(Vertex::new(pos.x, max.y, color));

    out.push(Vertex::new(max.x, pos.y, color));
    out.push(Vertex::new(max.x, max.y, color));
    out.push(Vertex::new(pos.x, max.y, color));
}

/// Square of side `2 * half` centered on `center`, rotated by `angle`
pub fn rotated_square(out: &mut Vec<Vertex>, center: Vec2, half: f32, angle: f32, color: [f32; 4]) {
    let rot = Vec2::from_angle(angle);
    let corners = [
        Vec2::new(-half, -half),
        Vec2::new(half, -half),
        Vec2::new(half, half),
        Vec2::new(-half, half),
    ]
    .map(|c| center + rot.rotate(c));

    triangle(out, corners[0], corners[1], corners[3], color);
    triangle(out, corners[1], corners[2], corners[3], color);
}

pub fn triangle(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));
}

/// Filled circle
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    out.reserve((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        out.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }
}

/// Hollow circle stroked with `thickness` centered on `radius`
pub fn ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    radius: f32,
    thickness: f32,
    color: [f32; 4],
    segments: u32,
) {
    let inner_radius = (radius - thickness / 2.0).max(0.0);
    let outer_radius = radius + thickness / 2.0;
    out.reserve((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());
        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        triangle(out, inner1, outer1, inner2, color);
        triangle(out, inner2, outer1, outer2, color);
    }
}
