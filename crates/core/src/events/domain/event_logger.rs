use chrono::{DateTime, Local};

/// Append-only record of detection events.
pub trait EventLogger: Send {
    /// Appends one entry. Entries are never reordered or rewritten.
    fn record(&mut self, at: DateTime<Local>, description: &str) -> std::io::Result<()>;
}
