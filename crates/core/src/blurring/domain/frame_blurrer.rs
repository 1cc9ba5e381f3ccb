use crate::shared::frame::Frame;

/// Domain interface for blurring a whole frame.
///
/// Implementations modify the frame in-place (`&mut Frame`) to avoid allocation.
pub trait FrameBlurrer: Send {
    fn blur(&self, frame: &mut Frame) -> Result<(), Box<dyn std::error::Error>>;
}
