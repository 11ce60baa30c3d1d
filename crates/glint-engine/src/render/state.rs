/// Frame submitter lifecycle.
///
/// `Idle -> Recording` on `begin_frame`, `Recording -> Flushing -> Idle` inside
/// `end_frame`. `Flushing` is only observable from the device while the batch
/// is being submitted.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum FrameState {
    #[default]
    Idle,
    Recording,
    Flushing,
}
