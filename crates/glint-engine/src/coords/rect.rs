use super::Vec2;

/// Axis-aligned rectangle (top-left origin).
///
/// Used both for screen-space quads and for normalized texture sub-rects.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    /// The full texture, `(0, 0)..(1, 1)`.
    pub const UNIT: Rect = Rect::new(0.0, 0.0, 1.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x, self.origin.y + self.size.y)
    }

    /// Corners in the rasterizer's quad winding:
    /// top-left, top-right, bottom-right, bottom-left.
    ///
    /// The rectangle is used as given; a negative size mirrors the quad, which
    /// is how flipped sprites and flipped texture rects are expressed.
    #[inline]
    pub fn corners(self) -> [Vec2; 4] {
        let min = self.min();
        let max = self.max();
        [
            Vec2::new(min.x, min.y),
            Vec2::new(max.x, min.y),
            Vec2::new(max.x, max.y),
            Vec2::new(min.x, max.y),
        ]
    }

    /// Returns the rectangle moved by `delta`.
    #[inline]
    pub fn translated(self, delta: Vec2) -> Self {
        Self::from_origin_size(self.origin + delta, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(x, y, w, h)
    }

    // ── corners ───────────────────────────────────────────────────────────

    #[test]
    fn corners_follow_quad_winding() {
        let c = r(8.0, 16.0, 32.0, 4.0).corners();
        assert_eq!(c[0], Vec2::new(8.0, 16.0));  // top-left
        assert_eq!(c[1], Vec2::new(40.0, 16.0)); // top-right
        assert_eq!(c[2], Vec2::new(40.0, 20.0)); // bottom-right
        assert_eq!(c[3], Vec2::new(8.0, 20.0));  // bottom-left
    }

    #[test]
    fn corners_of_flipped_rect_are_mirrored() {
        // Horizontal flip of the unit texture rect.
        let c = r(1.0, 0.0, -1.0, 1.0).corners();
        assert_eq!(c[0], Vec2::new(1.0, 0.0));
        assert_eq!(c[1], Vec2::new(0.0, 0.0));
    }

    #[test]
    fn translated_moves_origin_only() {
        let t = r(1.0, 1.0, 2.0, 3.0).translated(Vec2::new(4.0, -1.0));
        assert_eq!(t, r(5.0, 0.0, 2.0, 3.0));
    }
}
