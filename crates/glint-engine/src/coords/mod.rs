//! Coordinate and geometry types used on the engine side of the pipeline.
//!
//! Canonical CPU space:
//! - screen pixels, origin top-left
//! - +X right, +Y down
//! - texture coordinates normalized to `[0, 1]`
//!
//! Everything here is `f32`; conversion to fixed point happens when a vertex
//! enters the batch buffer.

mod rect;
mod vec2;
mod vec3;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use viewport::Viewport;
