//! Glint engine crate.
//!
//! Fixed-point vertex batching for a handheld fixed-function rasterizer:
//! per-frame geometry is converted to fixed point, accumulated in a bounded
//! batch and handed to the hardware in one bulk submission per frame.
//!
//! With the `preview` feature (default) the crate also carries a wgpu/winit
//! backend that emulates the rasterizer in a desktop window.

pub mod batch;
pub mod coords;
pub mod device;
pub mod fixed;
pub mod logging;
pub mod paint;
pub mod render;
pub mod texture;
pub mod time;

#[cfg(feature = "preview")]
pub mod core;
#[cfg(feature = "preview")]
pub mod window;

pub use batch::{BatchBuffer, Vertex, MAX_VERTICES};
pub use fixed::{DefaultPrecision, Fixed, Precision, Q12_4, Q16_16};
pub use render::{FrameReport, Renderer, RendererConfig};
