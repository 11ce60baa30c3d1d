//! Contract between the preview runtime and a game.
//!
//! The runtime owns the window, renderer and frame loop; a game implements
//! [`App`] and sees one [`FrameCtx`] per frame.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
