//! Axis-aligned bounding boxes
//!
//! Every solid entity (ship, enemies) is positioned by its top-left corner
//! with an explicit size, matching the y-down viewport space the host renders
//! in. Collision code works on these boxes; round things (bullets, orbs,
//! pickups) are circles tested against them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A box anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner in viewport space
    pub pos: Vec2,
    /// Width and height (non-negative)
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Top-left corner
    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    /// Bottom-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    /// Geometric center
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Box grown by `margin` on every side
    pub fn expand(&self, margin: f32) -> Self {
        Self {
            pos: self.pos - Vec2::splat(margin),
            size: self.size + Vec2::splat(margin * 2.0),
        }
    }

    /// Overlap test, touching edges count as overlapping
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.pos.x <= b_max.x
            && other.pos.x <= a_max.x
            && self.pos.y <= b_max.y
            && other.pos.y <= a_max.y
    }

    /// Check if a point lies inside the box (inclusive)
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.pos.x && point.x <= max.x && point.y >= self.pos.y && point.y <= max.y
    }

    /// Closest point on or inside the box to `point`
    #[inline]
    pub fn clamp_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min(), self.max())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_and_corners() {
        let b = Aabb::new(Vec2::new(10.0, 20.0), Vec2::new(40.0, 60.0));
        assert_eq!(b.min(), Vec2::new(10.0, 20.0));
        assert_eq!(b.max(), Vec2::new(50.0, 80.0));
        assert_eq!(b.center(), Vec2::new(30.0, 50.0));
    }

    #[test]
    fn test_overlaps() {
        let a = Aabb::new(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::new(Vec2::new(5.0, 5.0), Vec2::splat(10.0));
        let c = Aabb::new(Vec2::new(20.0, 0.0), Vec2::splat(5.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        // Touching edges count
        let d = Aabb::new(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        assert!(a.overlaps(&d));
    }

    #[test]
    fn test_contains_point() {
        let b = Aabb::new(Vec2::new(-5.0, -5.0), Vec2::splat(10.0));
        assert!(b.contains(Vec2::ZERO));
        assert!(b.contains(Vec2::new(5.0, 5.0)));
        assert!(!b.contains(Vec2::new(5.1, 0.0)));
    }

    #[test]
    fn test_expand() {
        let b = Aabb::new(Vec2::ZERO, Vec2::splat(10.0)).expand(80.0);
        assert_eq!(b.min(), Vec2::splat(-80.0));
        assert_eq!(b.max(), Vec2::splat(90.0));
    }

    #[test]
    fn test_clamp_point() {
        let b = Aabb::new(Vec2::ZERO, Vec2::splat(10.0));
        assert_eq!(b.clamp_point(Vec2::new(20.0, 5.0)), Vec2::new(10.0, 5.0));
        assert_eq!(b.clamp_point(Vec2::new(3.0, 4.0)), Vec2::new(3.0, 4.0));
    }
}
