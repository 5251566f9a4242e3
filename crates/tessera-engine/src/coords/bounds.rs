use super::Vec2;

/// Axis-aligned bounding box stored as min/max corners.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    #[inline]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    #[inline]
    pub const fn from_coords(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min: Vec2::new(min_x, min_y),
            max: Vec2::new(max_x, max_y),
        }
    }

    #[inline]
    pub fn width(self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn size(self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Closed containment: [min, max].
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        p.x >= self.min.x && p.y >= self.min.y && p.x <= self.max.x && p.y <= self.max.y
    }

    /// Smallest box covering both `self` and `other`.
    #[inline]
    pub fn union(self, other: Bounds) -> Bounds {
        Bounds::new(self.min.min(other.min), self.max.max(other.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(x0: f32, y0: f32, x1: f32, y1: f32) -> Bounds { Bounds::from_coords(x0, y0, x1, y1) }

    #[test]
    fn size_from_corners() {
        let bb = b(-1.0, -0.25, 3.0, 0.75);
        assert_eq!(bb.width(), 4.0);
        assert_eq!(bb.height(), 1.0);
        assert_eq!(bb.size(), Vec2::new(4.0, 1.0));
    }

    #[test]
    fn contains_edges_inclusive() {
        let bb = b(0.0, 0.0, 2.0, 1.0);
        assert!(bb.contains(Vec2::new(0.0, 0.0)));
        assert!(bb.contains(Vec2::new(2.0, 1.0)));
        assert!(!bb.contains(Vec2::new(2.1, 0.5)));
    }

    #[test]
    fn union_covers_both() {
        let u = b(0.0, 0.0, 1.0, 1.0).union(b(-1.0, 0.5, 0.5, 3.0));
        assert_eq!(u, b(-1.0, 0.0, 1.0, 3.0));
    }

    #[test]
    fn zero_width_is_empty() {
        assert!(b(0.0, -0.2, 0.0, 0.8).is_empty());
        assert!(!b(0.0, -0.2, 1.0, 0.8).is_empty());
    }
}
