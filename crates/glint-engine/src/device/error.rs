use super::MatrixMode;

/// Failures reported by a rasterizer backend.
///
/// All of these are fatal for the frame that hit them; the pipeline reports
/// them upward and never retries inside a frame budget.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("rendering surface was lost")]
    SurfaceLost,

    #[error("device is out of memory")]
    OutOfMemory,

    #[error("{mode:?} matrix stack overflow (depth {depth})")]
    MatrixStackOverflow { mode: MatrixMode, depth: usize },

    #[error("{mode:?} matrix stack underflow")]
    MatrixStackUnderflow { mode: MatrixMode },

    #[error("{0} is not supported by this device")]
    Unsupported(&'static str),
}
