//! Axis-aligned rectangle overlap tests
//!
//! Screen space: origin top-left, y grows downward.

use glam::Vec2;

/// An axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq)]
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

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Shrink by `pad` on every side
    pub fn inset(&self, pad: f32) -> Self {
        Self {
            pos: self.pos + Vec2::splat(pad),
            size: self.size - Vec2::splat(2.0 * pad),
        }
    }

    /// Strict overlap test (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Forgiving hit test: both boxes are shrunk by `pad` before the overlap check,
/// so contact that stays inside the combined margin does not register
pub fn overlaps_inset(a: &Rect, b: &Rect, pad: f32) -> bool {
    a.inset(pad).overlaps(&b.inset(pad))
}
