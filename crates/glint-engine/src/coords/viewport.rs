/// Screen size in pixels.
///
/// The renderer builds its orthographic projection from this size during
/// `init`, so queued positions are plain screen pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// The handheld's native screen.
    pub const HANDHELD: Viewport = Viewport::new(256.0, 192.0);

    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}
