//! Triangle-list tessellation for the cabinet's primitives

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;
use crate::sim::Rect;

/// Point on a circle of `radius` around `center` at segment `i` of `segments`
fn rim_point(center: Vec2, radius: f32, i: u32, segments: u32) -> Vec2 {
    let theta = (i as f32 / segments as f32) * TAU;
    center + Vec2::new(theta.cos(), theta.sin()) * radius
}

fn push_tri(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));
}

/// Filled circle as a triangle fan
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    out.reserve((segments * 3) as usize);

    for i in 0..segments {
        let p1 = rim_point(center, radius, i, segments);
        let p2 = rim_point(center, radius, i + 1, segments);
        push_tri(out, center, p1, p2, color);
    }
}

/// Hollow circle between `inner_radius` and `outer_radius`
pub fn ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) {
    out.reserve((segments * 6) as usize);

    for i in 0..segments {
        let inner1 = rim_point(center, inner_radius, i, segments);
        let outer1 = rim_point(center, outer_radius, i, segments);
        let inner2 = rim_point(center, inner_radius, i + 1, segments);
        let outer2 = rim_point(center, outer_radius, i + 1, segments);

        // Two triangles per segment
        push_tri(out, inner1, outer1, inner2, color);
        push_tri(out, inner2, outer1, outer2, color);
    }
}

/// Axis-aligned rectangle
pub fn rect(out: &mut Vec<Vertex>, rect: &Rect, color: [f32; 4]) {
    let min = rect.min();
    let max = rect.max();
    let tr = Vec2::new(max.x, min.y);
    let bl = Vec2::new(min.x, max.y);

    push_tri(out, min, tr, bl, color);
    push_tri(out, bl, tr, max, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_stays_on_radius() {
        let mut out = Vec::new();
        let center = Vec2::new(50.0, 20.0);
        circle(&mut out, center, 10.0, [1.0; 4], 16);

        assert_eq!(out.len(), 16 * 3);
        for v in &out {
            let d = Vec2::from(v.position).distance(center);
            assert!(d < 10.0 + 1e-3);
        }
    }

    #[test]
    fn test_ring_between_radii() {
        let mut out = Vec::new();
        ring(&mut out, Vec2::ZERO, 8.0, 12.0, [1.0; 4], 12);

        assert_eq!(out.len(), 12 * 6);
        for v in &out {
            let d = Vec2::from(v.position).length();
            assert!((8.0 - 1e-3..=12.0 + 1e-3).contains(&d));
        }
    }

    #[test]
    fn test_rect_covers_corners() {
        let mut out = Vec::new();
        let r = Rect::new(Vec2::new(10.0, 10.0), Vec2::new(4.0, 2.0));
        rect(&mut out, &r, [1.0; 4]);

        assert_eq!(out.len(), 6);
        let xs: Vec<f32> = out.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = out.iter().map(|v| v.position[1]).collect();
        assert!(xs.iter().all(|&x| x == 8.0 || x == 12.0));
        assert!(ys.iter().all(|&y| y == 9.0 || y == 11.0));
    }
}
