//! Desktop window + frame loop for the preview backend.
//!
//! Owns the `winit` event loop and one window bound to a
//! [`PreviewRasterizer`](crate::device::preview::PreviewRasterizer).

mod runtime;

pub use runtime::{PreviewRenderer, Runtime, RuntimeConfig};
