//! Shape generation for 2D primitives
//!
//! Every shape is tessellated into a triangle list in screen pixels.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

use super::vertex::Vertex;

/// Generate vertices for an axis-aligned filled rectangle
pub fn rect(pos: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    quad(
        pos,
        pos + Vec2::new(size.x, 0.0),
        pos + size,
        pos + Vec2::new(0.0, size.y),
        color,
    )
}

/// Two triangles over four corners given in winding order
pub fn quad(a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(a.x, a.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

/// Generate vertices for a filled convex polygon (triangle fan)
pub fn polygon(points: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }

    let first = points[0];
    let mut vertices = Vec::with_capacity((points.len() - 2) * 3);
    for pair in points[1..].windows(2) {
        vertices.push(Vertex::new(first.x, first.y, color));
        vertices.push(Vertex::new(pair[0].x, pair[0].y, color));
        vertices.push(Vertex::new(pair[1].x, pair[1].y, color));
    }
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    sector(center, radius, 0.0, TAU, color, segments)
}

/// Filled half-disc whose flat edge passes through `center`.
/// `bulge` points from the center toward the round side.
pub fn half_disc(
    center: Vec2,
    radius: f32,
    bulge: Vec2,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mid = bulge.y.atan2(bulge.x);
    sector(center, radius, mid - PI / 2.0, PI, color, segments)
}

/// Pie slice from `start` sweeping `span` radians
fn sector(
    center: Vec2,
    radius: f32,
    start: f32,
    span: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(1);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = start + (i as f32 / segments as f32) * span;
        let theta2 = start + ((i + 1) as f32 / segments as f32) * span;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a stroked line segment of the given width
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    quad(from + perp, to + perp, to - perp, from - perp, color)
}

/// Connected line segments through `points`
pub fn polyline(points: &[Vec2], width: f32, color: [f32; 4]) -> Vec<Vertex> {
    points
        .windows(2)
        .flat_map(|pair| line(pair[0], pair[1], width, color))
        .collect()
}

/// Closed outline around a polygon
pub fn outline(points: &[Vec2], width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let Some(&first) = points.first() else {
        return Vec::new();
    };
    let mut closed = points.to_vec();
    closed.push(first);
    polyline(&closed, width, color)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    fn bounds(vertices: &[Vertex]) -> (Vec2, Vec2) {
        vertices.iter().fold(
            (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
            |(lo, hi), v| {
                let p = Vec2::from(v.position);
                (lo.min(p), hi.max(p))
            },
        )
    }

    #[test]
    fn test_rect_covers_area() {
        let vertices = rect(Vec2::new(10.0, 20.0), Vec2::new(40.0, 60.0), WHITE);
        assert_eq!(vertices.len(), 6);
        let (lo, hi) = bounds(&vertices);
        assert_eq!(lo, Vec2::new(10.0, 20.0));
        assert_eq!(hi, Vec2::new(50.0, 80.0));
    }

    #[test]
    fn test_polygon_fan() {
        let square = [
            Vec2::ZERO,
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        assert_eq!(polygon(&square, WHITE).len(), 6);
        assert!(polygon(&square[..2], WHITE).is_empty());
    }

    #[test]
    fn test_circle_radius() {
        let vertices = circle(Vec2::new(5.0, 5.0), 3.0, WHITE, 16);
        assert_eq!(vertices.len(), 48);
        for v in &vertices {
            assert!(Vec2::from(v.position).distance(Vec2::new(5.0, 5.0)) <= 3.0 + 1e-4);
        }
    }

    #[test]
    fn test_half_disc_stays_on_bulge_side() {
        // Dome pointing up (negative y in screen space)
        let vertices = half_disc(Vec2::ZERO, 10.0, Vec2::NEG_Y, WHITE, 12);
        for v in &vertices {
            assert!(v.position[1] <= 1e-4);
        }
        let (lo, _) = bounds(&vertices);
        assert!((lo.y + 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_line_width() {
        let vertices = line(Vec2::ZERO, Vec2::new(10.0, 0.0), 4.0, WHITE);
        let (lo, hi) = bounds(&vertices);
        assert_eq!(lo, Vec2::new(0.0, -2.0));
        assert_eq!(hi, Vec2::new(10.0, 2.0));

        // Degenerate
        assert!(line(Vec2::ONE, Vec2::ONE, 4.0, WHITE).is_empty());
    }

    #[test]
    fn test_outline_closes_shape() {
        let tri = [Vec2::ZERO, Vec2::new(4.0, 0.0), Vec2::new(0.0, 4.0)];
        // Three edges, six vertices each
        assert_eq!(outline(&tri, 1.0, WHITE).len(), 18);
    }
}
