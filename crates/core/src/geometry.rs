//! Axis-aligned boxes in level units (`y` grows upward).

use super_capy_types::RectSpec;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Strict overlap; boxes that only share an edge do not touch.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.bottom() < other.top()
            && self.top() > other.bottom()
    }

    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.left() < other.right() && self.right() > other.left()
    }

    /// Shrink every side inward by `margin`, never below zero size.
    pub fn shrink(&self, margin: f32) -> Aabb {
        let dx = margin.min(self.width / 2.0);
        let dy = margin.min(self.height / 2.0);
        Aabb::new(
            self.x + dx,
            self.y + dy,
            self.width - 2.0 * dx,
            self.height - 2.0 * dy,
        )
    }
}

impl From<RectSpec> for Aabb {
    fn from(r: RectSpec) -> Self {
        Aabb::new(r.x, r.y, r.width, r.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&Aabb::new(9.0, 9.0, 5.0, 5.0)));
    }

    #[test]
    fn shrink_keeps_center() {
        let a = Aabb::new(10.0, 20.0, 40.0, 30.0).shrink(6.0);
        assert_eq!(a, Aabb::new(16.0, 26.0, 28.0, 18.0));
        let tiny = Aabb::new(0.0, 0.0, 4.0, 4.0).shrink(6.0);
        assert_eq!(tiny.width, 0.0);
        assert_eq!(tiny.center_x(), 2.0);
    }
}
