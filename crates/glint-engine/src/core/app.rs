use winit::event::WindowEvent;

use crate::window::PreviewRenderer;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// A game driven by the preview runtime.
pub trait App {
    /// Called once after the renderer is initialized, before the first frame.
    ///
    /// The renderer is idle here, so this is where textures are uploaded.
    fn on_start(&mut self, renderer: &mut PreviewRenderer<'_>) -> anyhow::Result<()> {
        let _ = renderer;
        Ok(())
    }

    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per frame between `begin_frame` and `end_frame`.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
