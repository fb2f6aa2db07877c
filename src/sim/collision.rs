//! Axis-aligned rectangle collision
//!
//! Everything that can collide in this game is an upright rectangle in
//! playfield coordinates (origin top-left, y down).

use glam::Vec2;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// True when the interiors overlap; touching edges do not count
    pub fn intersects(&self, other: &Rect) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x
            && other.min.x < a_max.x
            && self.min.y < b_max.y
            && other.min.y < a_max.y
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.min.x && p.x < max.x && p.y >= self.min.y && p.y < max.y
    }
}

/// Index of the first zone (in iteration order) that `body` overlaps.
///
/// At most one zone is reported even if the body spans several.
pub fn first_hit(body: &Rect, zones: &[Rect]) -> Option<usize> {
    zones.iter().position(|zone| body.intersects(zone))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.intersects(&right));
        assert!(!a.intersects(&below));
    }

    #[test]
    fn test_containment_counts_as_overlap() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 5.0, 5.0);
        assert!(outer.intersects(&inner));
        assert!(inner.intersects(&outer));
    }

    #[test]
    fn test_first_hit_prefers_earliest_zone() {
        let zones = [
            Rect::new(0.0, 0.0, 50.0, 50.0),
            Rect::new(0.0, 50.0, 50.0, 50.0),
            Rect::new(0.0, 100.0, 50.0, 50.0),
        ];
        // Straddles zones 0 and 1
        let body = Rect::new(10.0, 40.0, 20.0, 20.0);
        assert_eq!(first_hit(&body, &zones), Some(0));

        let body = Rect::new(10.0, 120.0, 20.0, 10.0);
        assert_eq!(first_hit(&body, &zones), Some(2));

        let body = Rect::new(100.0, 0.0, 20.0, 20.0);
        assert_eq!(first_hit(&body, &zones), None);
    }

    #[test]
    fn test_contains_point() {
        let r = Rect::new(10.0, 10.0, 10.0, 10.0);
        assert!(r.contains_point(Vec2::new(10.0, 10.0)));
        assert!(!r.contains_point(Vec2::new(20.0, 15.0)));
        assert_eq!(r.center(), Vec2::new(15.0, 15.0));
    }
}
