//! Frame pacing.
//!
//! - [`VBlankPacer`] emulates the display's vertical blank for backends that
//!   have no real one (the desktop preview)
//! - [`FrameClock`] hands the application a clamped per-frame delta

mod frame_clock;
mod vblank;

pub use frame_clock::{FrameClock, FrameTime};
pub use vblank::{VBlankConfig, VBlankPacer};
