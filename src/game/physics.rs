//! Collision primitives and movement helpers

use super::arena::{Obstacle, ARENA_HEIGHT, ARENA_WIDTH};

/// Axis-aligned rectangle, anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn square(x: f32, y: f32, size: f32) -> Self {
        Self {
            x,
            y,
            width: size,
            height: size,
        }
    }
}

impl From<&Obstacle> for Rect {
    fn from(obs: &Obstacle) -> Self {
        Self {
            x: obs.x,
            y: obs.y,
            width: obs.width,
            height: obs.height,
        }
    }
}

/// True iff the rectangles share a region of positive area.
/// Boxes that only touch along an edge do not overlap.
pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

/// True iff the `size`x`size` box at (x, y) overlaps any obstacle
pub fn collides_any(x: f32, y: f32, size: f32, obstacles: &[Obstacle]) -> bool {
    let probe = Rect::square(x, y, size);
    obstacles.iter().any(|obs| overlaps(probe, obs.into()))
}

/// Unit vector from (from_x, from_y) toward (to_x, to_y), None when the points coincide
pub fn direction(from_x: f32, from_y: f32, to_x: f32, to_y: f32) -> Option<(f32, f32)> {
    let dx = to_x - from_x;
    let dy = to_y - from_y;
    let dist = dx.hypot(dy);
    if dist > 0.0 {
        Some((dx / dist, dy / dist))
    } else {
        None
    }
}

/// Distance between two points
pub fn distance(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    (x2 - x1).hypot(y2 - y1)
}

/// Keep a `size`x`size` box inside the arena
pub fn clamp_to_arena(x: f32, y: f32, size: f32) -> (f32, f32) {
    (
        x.clamp(0.0, ARENA_WIDTH - size),
        y.clamp(0.0, ARENA_HEIGHT - size),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::arena::ObstacleKind;

    fn block() -> Obstacle {
        Obstacle::new(100.0, 100.0, 50.0, 50.0, ObstacleKind::Tower)
    }

    #[test]
    fn test_box_inside_overlaps() {
        assert!(overlaps(Rect::square(110.0, 110.0, 10.0), (&block()).into()));
    }

    #[test]
    fn test_box_outside_does_not_overlap() {
        assert!(!overlaps(Rect::square(0.0, 0.0, 10.0), (&block()).into()));
        assert!(!overlaps(Rect::square(200.0, 120.0, 10.0), (&block()).into()));
        assert!(!overlaps(Rect::square(120.0, 160.0, 10.0), (&block()).into()));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        // right edge of probe == left edge of block
        assert!(!overlaps(Rect::square(90.0, 110.0, 10.0), (&block()).into()));
        // top edge of probe == bottom edge of block
        assert!(!overlaps(Rect::square(110.0, 150.0, 10.0), (&block()).into()));
    }

    #[test]
    fn test_partial_overlap() {
        assert!(overlaps(Rect::square(95.0, 95.0, 10.0), (&block()).into()));
    }

    #[test]
    fn test_collides_any() {
        let obstacles = vec![block()];
        assert!(collides_any(140.0, 140.0, 20.0, &obstacles));
        assert!(!collides_any(300.0, 300.0, 20.0, &obstacles));
        assert!(!collides_any(140.0, 140.0, 20.0, &[]));
    }

    #[test]
    fn test_direction() {
        assert_eq!(direction(0.0, 0.0, 10.0, 0.0), Some((1.0, 0.0)));
        assert!(direction(5.0, 5.0, 5.0, 5.0).is_none());

        let (dx, dy) = direction(0.0, 0.0, 3.0, 4.0).unwrap();
        assert!((dx - 0.6).abs() < 1e-6);
        assert!((dy - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_clamp_to_arena() {
        assert_eq!(clamp_to_arena(-5.0, -1.0, 35.0), (0.0, 0.0));
        assert_eq!(
            clamp_to_arena(5000.0, 5000.0, 35.0),
            (ARENA_WIDTH - 35.0, ARENA_HEIGHT - 35.0)
        );
    }
}
