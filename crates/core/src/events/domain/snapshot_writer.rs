use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::shared::frame::Frame;

/// Persists the frame an event fired on.
pub trait SnapshotWriter: Send {
    /// Writes a new image named from `label` and `at`; returns its path.
    fn save(
        &mut self,
        frame: &Frame,
        label: &str,
        at: DateTime<Local>,
    ) -> Result<PathBuf, Box<dyn std::error::Error>>;
}
