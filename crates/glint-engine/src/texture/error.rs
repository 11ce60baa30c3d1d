use crate::device::DeviceError;

use super::TextureId;

/// Texture upload failures.
///
/// Every variant means an asset or configuration defect, not a runtime
/// condition: callers are expected to stop loading rather than retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextureError {
    #[error("texture size {width}x{height} is unsupported (power of two, 8..=1024 per axis)")]
    UnsupportedSize { width: u32, height: u32 },

    #[error("pixel source holds {actual} texels, {expected} expected")]
    SourceLength { expected: usize, actual: usize },

    #[error("palette has {entries} entries, at most 256 are addressable")]
    PaletteTooLarge { entries: usize },

    #[error("texture {id:?} needs {required} bytes of texture memory, {available} available")]
    BankOverflow {
        id: TextureId,
        required: usize,
        available: usize,
    },

    #[error("texture {id:?} needs {required} bytes of palette memory, {available} available")]
    PaletteOverflow {
        id: TextureId,
        required: usize,
        available: usize,
    },

    #[error("texture {0:?} is unknown")]
    Unknown(TextureId),

    #[error("textures cannot be uploaded while a frame is recording or flushing")]
    FrameInProgress,

    #[error(transparent)]
    Device(#[from] DeviceError),
}
