//! Axis-aligned rectangle overlap
//!
//! Every entity in the field is an upright box, so collision is a pair of
//! interval tests. Edges that touch count as a hit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle: top-left corner plus size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Boundary-inclusive overlap test
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        rects_overlap(self, other)
    }
}

/// True when the x-ranges and y-ranges of `a` and `b` both intersect
/// (closed intervals, so shared edges and corners collide)
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    !(a.right() < b.pos.x || a.pos.x > b.right() || a.bottom() < b.pos.y || a.pos.y > b.bottom())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_edges_collide() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(rects_overlap(&a, &b));
        assert!(rects_overlap(&b, &a));
    }

    #[test]
    fn test_touching_corner_collides() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 10.0, 5.0, 5.0);
        assert!(a.overlaps(&b));
    }

    #[test]
    fn test_separated_rects_miss() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&Rect::new(10.01, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(0.0, -20.0, 10.0, 9.5)));
        // Overlapping on x alone is not enough
        assert!(!a.overlaps(&Rect::new(5.0, 30.0, 10.0, 10.0)));
    }

    #[test]
    fn test_contained_rect_collides() {
        let outer = Rect::new(100.0, 100.0, 48.0, 48.0);
        let inner = Rect::new(110.0, 110.0, 10.0, 10.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }
}
