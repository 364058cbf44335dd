use crate::shared::frame::Frame;

/// Operator-facing live view and stop control.
pub trait PreviewSurface {
    fn render(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Polled once per cycle; `true` ends monitoring after the current cycle.
    fn stop_requested(&mut self) -> bool;

    /// Releases windows or threads. Safe to call more than once.
    fn close(&mut self);
}
