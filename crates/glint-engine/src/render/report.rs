/// The submission path a frame actually took.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SubmitPath {
    Immediate,
    Array,
}

/// Per-frame submission statistics returned by `Renderer::end_frame`.
///
/// Purely diagnostic; overflow is never an error.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Frames ended so far, including this one.
    pub frame_index: u64,
    /// Vertices handed to the device.
    pub submitted: usize,
    /// Vertices rejected by the batch's overflow policy.
    pub dropped: usize,
    /// `None` when the frame was empty and nothing reached the device.
    pub path: Option<SubmitPath>,
}

impl FrameReport {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.submitted == 0
    }

    #[inline]
    pub fn overflowed(&self) -> bool {
        self.dropped > 0
    }
}
