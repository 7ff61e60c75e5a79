//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in grid units.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Axis-aligned filled rectangle
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let max = min + size;
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Square of side `size` centred on `center`
pub fn square(center: Vec2, size: f32, color: [f32; 4]) -> Vec<Vertex> {
    let half = Vec2::splat(size * 0.5);
    rect(center - half, Vec2::splat(size), color)
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

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

/// Quad of the given width along `from -> to`
pub fn thick_segment(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    // Perpendicular for width
    let perp = dir.perp() * (width * 0.5);

    let a1 = from + perp;
    let b1 = from - perp;
    let a2 = to + perp;
    let b2 = to - perp;

    vec![
        Vertex::new(a1.x, a1.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(b2.x, b2.y, color),
    ]
}

/// Thick polyline with round joints
pub fn polyline(points: &[Vec2], width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for pair in points.windows(2) {
        vertices.extend(thick_segment(pair[0], pair[1], width, color));
    }
    for &p in points {
        vertices.extend(circle(p, width * 0.5, color, 12));
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_corners() {
        let v = rect(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), [1.0; 4]);
        assert_eq!(v.len(), 6);
        let xs: Vec<f32> = v.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = v.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 1.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 4.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 2.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 6.0);
    }

    #[test]
    fn test_degenerate_segment_is_empty() {
        assert!(thick_segment(Vec2::ONE, Vec2::ONE, 0.5, [1.0; 4]).is_empty());
    }

    #[test]
    fn test_thick_segment_width() {
        let v = thick_segment(Vec2::ZERO, Vec2::new(2.0, 0.0), 0.5, [1.0; 4]);
        assert_eq!(v.len(), 6);
        for vert in &v {
            assert!((vert.position[1].abs() - 0.25).abs() < 1e-6);
        }
    }

    #[test]
    fn test_polyline_counts() {
        let points = [Vec2::ZERO, Vec2::X, Vec2::new(1.0, 1.0)];
        let v = polyline(&points, 0.5, [1.0; 4]);
        assert_eq!(v.len(), 2 * 6 + 3 * 12 * 3);
    }
}
