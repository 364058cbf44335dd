use std::collections::HashMap;
use std::fmt;

use crate::events::domain::detection_event::EventKind;

/// Why the monitor loop stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    OperatorQuit,
    StreamEnded,
    CaptureFailed(String),
}

/// Counters accumulated over one monitoring session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MonitorReport {
    pub cycles: usize,
    pub events: HashMap<EventKind, usize>,
    pub detection_failures: usize,
    pub write_failures: usize,
    pub stop_reason: Option<StopReason>,
}

impl MonitorReport {
    pub fn events_of(&self, kind: EventKind) -> usize {
        self.events.get(&kind).copied().unwrap_or(0)
    }

    pub(crate) fn count_event(&mut self, kind: EventKind) {
        *self.events.entry(kind).or_default() += 1;
    }
}

impl fmt::Display for MonitorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cycles, {} multiple-face events, {} prohibited-object events",
            self.cycles,
            self.events_of(EventKind::MultipleFaces),
            self.events_of(EventKind::ProhibitedObject)
        )?;
        if self.detection_failures > 0 || self.write_failures > 0 {
            write!(
                f,
                " ({} detection failures, {} write failures)",
                self.detection_failures, self.write_failures
            )?;
        }
        Ok(())
    }
}
