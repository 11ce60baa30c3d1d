//! Desktop preview backend.
//!
//! Emulates the handheld rasterizer on a desktop GPU through wgpu so games
//! can be run and inspected in a window. Geometry still goes through the
//! fixed-point pipeline; only the final raster step is emulated.

mod decode;
mod gpu;
mod rasterizer;
mod stage;
mod surface;

pub use gpu::{Gpu, GpuFrame, GpuInit};
pub use rasterizer::{PreviewInit, PreviewRasterizer};
pub use surface::SurfaceErrorAction;
