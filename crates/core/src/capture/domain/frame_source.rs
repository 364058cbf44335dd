use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum FrameSourceError {
    #[error("camera {device} not found or cannot be accessed: {reason}")]
    DeviceUnavailable { device: String, reason: String },
    #[error("unable to capture frame: {0}")]
    CaptureFailed(String),
}

/// Sequential frames from a single capture device.
///
/// `close` must be safe to call more than once and on a source that was
/// never opened.
pub trait FrameSource: Send {
    fn open(&mut self) -> Result<(), FrameSourceError>;

    /// Next frame, or `Ok(None)` once the stream has ended.
    fn next_frame(&mut self) -> Result<Option<Frame>, FrameSourceError>;

    fn close(&mut self);
}
