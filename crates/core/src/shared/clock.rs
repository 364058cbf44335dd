use chrono::{DateTime, Local};

/// Source of wall-clock time for event timestamps.
pub trait Clock: Send {
    fn now(&self) -> DateTime<Local>;
}

/// Local system time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
