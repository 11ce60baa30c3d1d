//! Hardware boundary.
//!
//! This module is responsible for:
//! - the [`Rasterizer`] trait every backend implements (the only way the
//!   pipeline talks to hardware)
//! - the emulated matrix stack shared by software backends
//! - the headless backend used by tests and tooling
//! - the wgpu desktop preview backend (feature `preview`)

mod error;
mod headless;
mod matrix;
mod rasterizer;

#[cfg(feature = "preview")]
pub mod preview;

pub use error::DeviceError;
pub use headless::{DeviceCommand, HeadlessRasterizer};
pub use matrix::{MatrixMode, MatrixStack};
pub use rasterizer::{Capabilities, Primitive, Rasterizer};
