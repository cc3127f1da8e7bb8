//! Collision primitives for the combat resolver
//!
//! Everything here is a pure function over positions and shapes. The tick
//! orchestrator decides what a hit *means* (damage, pickup, game over); this
//! module only answers whether shapes touch.
//!
//! Conventions: bullets, orbs and power-ups are circles; the ship and enemies
//! are AABBs; a laser beam is a capsule of finite width extending from its
//! origin along a unit direction.

use glam::Vec2;

use super::aabb::Aabb;

/// Circle-vs-box overlap, the bullet-impact test
///
/// Clamps the circle center onto the box and compares the residual distance
/// against the radius, so corners are handled exactly.
pub fn circle_hits_aabb(center: Vec2, radius: f32, rect: &Aabb) -> bool {
    let closest = rect.clamp_point(center);
    center.distance_squared(closest) <= radius * radius
}

/// Point-within-range test used for orb and power-up pickup
#[inline]
pub fn within_radius(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) <= radius * radius
}

/// Beam capsule cover test
///
/// `dir` must be normalized. A point is covered when its perpendicular
/// distance from the beam line is under half the beam width and its forward
/// projection is not behind the origin by more than `back_tolerance`, so
/// enemies sitting on the muzzle still take damage.
pub fn beam_covers(origin: Vec2, dir: Vec2, width: f32, back_tolerance: f32, point: Vec2) -> bool {
    let rel = point - origin;
    let along = rel.dot(dir);
    if along < -back_tolerance {
        return false;
    }
    let perp = rel - dir * along;
    perp.length_squared() < (width * 0.5) * (width * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_aabb_face_hit() {
        let rect = Aabb::new(Vec2::new(10.0, 10.0), Vec2::splat(20.0));
        // Approaching the left face
        assert!(circle_hits_aabb(Vec2::new(7.0, 20.0), 4.0, &rect));
        assert!(!circle_hits_aabb(Vec2::new(5.0, 20.0), 4.0, &rect));
    }

    #[test]
    fn test_circle_aabb_corner() {
        let rect = Aabb::new(Vec2::ZERO, Vec2::splat(10.0));
        // Corner distance is sqrt(2) ≈ 1.414 from (-1,-1)
        assert!(circle_hits_aabb(Vec2::new(-1.0, -1.0), 1.5, &rect));
        assert!(!circle_hits_aabb(Vec2::new(-1.0, -1.0), 1.0, &rect));
    }

    #[test]
    fn test_circle_inside_aabb() {
        let rect = Aabb::new(Vec2::ZERO, Vec2::splat(10.0));
        assert!(circle_hits_aabb(Vec2::new(5.0, 5.0), 0.5, &rect));
    }

    #[test]
    fn test_within_radius() {
        assert!(within_radius(Vec2::ZERO, Vec2::new(3.0, 4.0), 5.0));
        assert!(!within_radius(Vec2::ZERO, Vec2::new(3.0, 4.0), 4.9));
    }

    #[test]
    fn test_beam_covers_along_axis() {
        let origin = Vec2::ZERO;
        let dir = Vec2::new(0.0, -1.0);
        // Directly up the beam, well within width
        assert!(beam_covers(origin, dir, 26.0, 8.0, Vec2::new(5.0, -100.0)));
        // Too far off-axis
        assert!(!beam_covers(origin, dir, 26.0, 8.0, Vec2::new(14.0, -100.0)));
    }

    #[test]
    fn test_beam_back_tolerance() {
        let origin = Vec2::ZERO;
        let dir = Vec2::new(1.0, 0.0);
        // Slightly behind the origin still counts
        assert!(beam_covers(origin, dir, 26.0, 8.0, Vec2::new(-5.0, 0.0)));
        // Far behind does not
        assert!(!beam_covers(origin, dir, 26.0, 8.0, Vec2::new(-20.0, 0.0)));
    }

    #[test]
    fn test_beam_has_no_far_cap() {
        // Beams damage everything down-range for their short life
        assert!(beam_covers(
            Vec2::ZERO,
            Vec2::new(1.0, 0.0),
            26.0,
            8.0,
            Vec2::new(5000.0, 3.0)
        ));
    }
}
