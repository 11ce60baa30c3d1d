//! Vertex color.
//!
//! One canonical representation crosses the pipeline: 8 bits per channel, no
//! per-vertex alpha. Engine-packed `0xRRGGBB` values and the hardware's native
//! 5-bit channels are converted at the edges with the helpers on [`Color`].

mod color;

pub use color::Color;
