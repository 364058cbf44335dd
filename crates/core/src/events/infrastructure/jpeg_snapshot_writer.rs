use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::events::domain::snapshot_writer::SnapshotWriter;
use crate::shared::constants::{SNAPSHOT_EXTENSION, SNAPSHOT_TIMESTAMP_FORMAT};
use crate::shared::frame::Frame;

/// Encodes snapshot frames as JPEG files named `<label>_<YYYYMMDD_HHMMSS>.jpg`.
///
/// Files are never overwritten: a second snapshot with the same label in the
/// same second gets a `_1`, `_2`, ... suffix.
pub struct JpegSnapshotWriter {
    dir: PathBuf,
}

impl JpegSnapshotWriter {
    /// Writer into `dir`, creating it if needed.
    pub fn new(dir: &Path) -> std::io::Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn available_path(&self, label: &str, at: DateTime<Local>) -> PathBuf {
        let stem = format!("{label}_{}", at.format(SNAPSHOT_TIMESTAMP_FORMAT));
        let first = self.dir.join(format!("{stem}.{SNAPSHOT_EXTENSION}"));
        if !first.exists() {
            return first;
        }
        (1..)
            .map(|n| self.dir.join(format!("{stem}_{n}.{SNAPSHOT_EXTENSION}")))
            .find(|p| !p.exists())
            .unwrap_or(first)
    }
}

impl SnapshotWriter for JpegSnapshotWriter {
    fn save(
        &mut self,
        frame: &Frame,
        label: &str,
        at: DateTime<Local>,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        if frame.channels() != 3 {
            return Err(format!("expected an RGB frame, got {} channels", frame.channels()).into());
        }
        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("Failed to create image from frame data")?;

        let path = self.available_path(label, at);
        img.save_with_format(&path, image::ImageFormat::Jpeg)?;
        Ok(path)
    }
}
