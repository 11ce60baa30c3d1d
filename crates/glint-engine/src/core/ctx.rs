use crate::coords::{Rect, Vec2};
use crate::paint::Color;
use crate::render::FrameReport;
use crate::time::FrameTime;
use crate::window::PreviewRenderer;

/// Per-frame context passed to `App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback
/// - `'w` is the window borrow carried by the preview rasterizer
pub struct FrameCtx<'a, 'w> {
    /// Already recording; queue geometry here.
    pub renderer: &'a mut PreviewRenderer<'w>,
    pub time: FrameTime,
    /// Statistics of the previous frame, if there was one.
    pub last_report: Option<FrameReport>,
}

impl FrameCtx<'_, '_> {
    /// Queues an untransformed sprite: `size` pixels at `pos`, sampling `uv`.
    #[inline]
    pub fn sprite(&mut self, pos: Vec2, size: Vec2, uv: Rect, tint: Color) -> bool {
        self.renderer
            .queue_quad(Rect::from_origin_size(pos, size), uv, tint)
    }
}
