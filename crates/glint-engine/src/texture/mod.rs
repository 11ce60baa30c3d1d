//! Texture upload adapter.
//!
//! Pushes CPU-side texel and palette data into the rasterizer's texture banks
//! and declares each region's size and format to the hardware. Uploads are
//! synchronous bulk copies; anything that does not fit is rejected whole.

mod error;
mod format;
mod memory;
mod registry;

pub use error::TextureError;
pub use format::{
    direct_texel, is_supported_size, PixelSource, TexelFormat, TextureDesc, MAX_PALETTE_ENTRIES,
    MAX_TEXTURE_SIZE, MIN_TEXTURE_SIZE,
};
pub use memory::TextureMemory;
pub use registry::{TextureId, TextureRegistry, TextureTable};
