use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::events::domain::event_logger::EventLogger;
use crate::shared::constants::{LOG_FILE_NAME, LOG_TIMESTAMP_FORMAT};

/// Appends `"<YYYY-MM-DD HH:MM:SS> - <description>"` lines to a text file.
///
/// The file is opened lazily in append mode and flushed after every line.
/// After a failed write the handle is dropped and reopened on the next
/// record, so a transient error costs one entry at most.
pub struct FileEventLogger {
    path: PathBuf,
    file: Option<File>,
}

impl FileEventLogger {
    /// Logger for `<log_dir>/cheating_log.txt`, creating `log_dir` if needed.
    pub fn new(log_dir: &Path) -> std::io::Result<Self> {
        fs::create_dir_all(log_dir)?;
        Ok(Self::at_path(log_dir.join(LOG_FILE_NAME)))
    }

    pub fn at_path(path: PathBuf) -> Self {
        Self { path, file: None }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn handle(&mut self) -> std::io::Result<&mut File> {
        let file = match self.file.take() {
            Some(file) => file,
            None => OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?,
        };
        Ok(self.file.insert(file))
    }
}

pub fn format_entry(at: DateTime<Local>, description: &str) -> String {
    format!("{} - {description}\n", at.format(LOG_TIMESTAMP_FORMAT))
}

impl EventLogger for FileEventLogger {
    fn record(&mut self, at: DateTime<Local>, description: &str) -> std::io::Result<()> {
        let line = format_entry(at, description);
        let result = self.handle().and_then(|file| {
            file.write_all(line.as_bytes())?;
            file.flush()
        });
        if result.is_err() {
            self.file = None;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 1, h, m, s).unwrap()
    }

    #[test]
    fn test_format_entry() {
        assert_eq!(
            format_entry(at(9, 5, 7), "Multiple faces detected"),
            "2026-03-01 09:05:07 - Multiple faces detected\n"
        );
    }

    #[test]
    fn test_new_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("logs");
        let logger = FileEventLogger::new(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(logger.path(), dir.join("cheating_log.txt"));
        // Idempotent when the directory already exists
        FileEventLogger::new(&dir).unwrap();
    }

    #[test]
    fn test_records_append_in_write_order() {
        let tmp = tempfile::tempdir().unwrap();
        let mut logger = FileEventLogger::new(tmp.path()).unwrap();
        logger.record(at(10, 0, 0), "Multiple faces detected").unwrap();
        logger.record(at(10, 0, 1), "Mobile phone detected").unwrap();

        let text = fs::read_to_string(logger.path()).unwrap();
        assert_eq!(
            text,
            "2026-03-01 10:00:00 - Multiple faces detected\n\
             2026-03-01 10:00:01 - Mobile phone detected\n"
        );
    }

    #[test]
    fn test_existing_log_is_appended_not_truncated() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(LOG_FILE_NAME);
        fs::write(&path, "earlier entry\n").unwrap();

        let mut logger = FileEventLogger::new(tmp.path()).unwrap();
        logger.record(at(11, 30, 0), "Mobile phone detected").unwrap();

        let lines: Vec<String> = fs::read_to_string(&path)
            .unwrap()
            .lines()
            .map(String::from)
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "earlier entry");
    }

    #[test]
    fn test_unwritable_path_errors_then_recovers() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("later");
        let mut logger = FileEventLogger::at_path(dir.join(LOG_FILE_NAME));
        assert!(logger.record(at(12, 0, 0), "Mobile phone detected").is_err());

        fs::create_dir_all(&dir).unwrap();
        logger.record(at(12, 0, 1), "Mobile phone detected").unwrap();
        let text = fs::read_to_string(logger.path()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
