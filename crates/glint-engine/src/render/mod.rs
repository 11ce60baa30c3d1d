//! Frame submitter.
//!
//! [`Renderer`] owns the per-frame vertex batch and drives the rasterizer
//! through `begin_frame -> queue_* -> end_frame`. Geometry is converted to
//! fixed point at queue time; the whole batch reaches the device in one bulk
//! submission at the end of the frame.
//!
//! Convention:
//! - positions are in screen pixels (top-left origin, +Y down) under the
//!   init-time orthographic projection
//! - texture coordinates are normalized (`0..1`)

mod config;
mod renderer;
mod report;
mod state;

pub use config::{RendererConfig, SubmitMode};
pub use renderer::Renderer;
pub use report::{FrameReport, SubmitPath};
pub use state::FrameState;
