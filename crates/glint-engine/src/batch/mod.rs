//! Per-frame vertex storage.
//!
//! Responsibilities:
//! - hold fixed-point vertices for the current frame only
//! - enforce the hard per-frame geometry ceiling (fail-open: excess is dropped)
//! - never allocate after construction

mod buffer;
mod vertex;

pub use buffer::{BatchBuffer, MAX_VERTICES};
pub use vertex::Vertex;
