//! Axis-aligned rectangle geometry for every entity
//!
//! Positions are kept as floats so that fractional fall speeds accumulate,
//! but intersection is evaluated on the pixel grid: each edge is truncated
//! toward zero before testing. A rectangle whose snapped width or height is
//! not positive is empty and never intersects anything.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A rectangle in field space (origin top-left, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
}

/// A rectangle snapped to whole pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl PixelRect {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }
}

impl Rect {
    pub const ZERO: Rect = Rect {
        pos: Vec2::ZERO,
        size: Vec2::ZERO,
    };

    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn square(x: f32, y: f32, side: f32) -> Self {
        Self::new(x, y, side, side)
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Truncate every component to the pixel grid
    pub fn snapped(&self) -> PixelRect {
        PixelRect {
            x: self.pos.x as i32,
            y: self.pos.y as i32,
            w: self.size.x as i32,
            h: self.size.y as i32,
        }
    }

    /// True if the rectangle covers no whole pixel
    pub fn is_empty(&self) -> bool {
        self.snapped().is_empty()
    }

    /// Pixel-grid overlap test. Touching edges do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        let a = self.snapped();
        let b = other.snapped();
        if a.is_empty() || b.is_empty() {
            return false;
        }

        let left = a.x.max(b.x);
        let right = (a.x + a.w).min(b.x + b.w);
        if right <= left {
            return false;
        }

        let top = a.y.max(b.y);
        let bottom = (a.y + a.h).min(b.y + b.h);
        bottom > top
    }

    /// Shrink to zero area at the given position
    pub fn collapse_at(&mut self, x: f32, y: f32) {
        self.pos = Vec2::new(x, y);
        self.size = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlapping_rects_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        let c = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_fractional_positions_are_truncated() {
        // 9.9 truncates to 9, so the right edge sits at 19 and touches b
        let a = Rect::new(9.9, 0.0, 10.0, 10.0);
        let b = Rect::new(19.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        let c = Rect::new(18.5, 0.0, 10.0, 10.0);
        assert!(a.intersects(&c));
    }

    #[test]
    fn test_sub_pixel_rect_is_empty() {
        let tiny = Rect::new(5.0, 5.0, 0.5, 20.0);
        assert!(tiny.is_empty());
        assert!(!tiny.intersects(&Rect::new(0.0, 0.0, 100.0, 100.0)));
    }

    #[test]
    fn test_collapse_makes_rect_empty() {
        let mut r = Rect::square(100.0, 100.0, 80.0);
        r.collapse_at(0.0, 699.0);
        assert!(r.is_empty());
        assert_eq!(r.pos, Vec2::new(0.0, 699.0));
    }

    proptest! {
        #[test]
        fn zero_area_never_intersects(
            x in -1000.0f32..1000.0,
            y in -1000.0f32..1000.0,
            ox in -1000.0f32..1000.0,
            oy in -1000.0f32..1000.0,
            ow in 0.0f32..500.0,
            oh in 0.0f32..500.0,
        ) {
            let mut dead = Rect::square(x, y, 50.0);
            dead.collapse_at(x, y);
            let other = Rect::new(ox, oy, ow, oh);
            prop_assert!(!dead.intersects(&other));
            prop_assert!(!other.intersects(&dead));
        }

        #[test]
        fn intersection_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            aw in 0.0f32..200.0, ah in 0.0f32..200.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            bw in 0.0f32..200.0, bh in 0.0f32..200.0,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            prop_assert_eq!(a.intersects(&b), b.intersects(&a));
        }
    }
}
