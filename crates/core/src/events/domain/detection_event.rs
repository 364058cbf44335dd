use chrono::{DateTime, Local};

/// The two conditions that mark a frame as suspicious.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    MultipleFaces,
    ProhibitedObject,
}

impl EventKind {
    /// Text written to the cheating log.
    pub fn description(self) -> &'static str {
        match self {
            EventKind::MultipleFaces => "Multiple faces detected",
            EventKind::ProhibitedObject => "Mobile phone detected",
        }
    }

    /// Prefix of the snapshot file name.
    pub fn snapshot_label(self) -> &'static str {
        match self {
            EventKind::MultipleFaces => "multiple_faces",
            EventKind::ProhibitedObject => "mobile_phone",
        }
    }
}

/// A trigger condition that held for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectionEvent {
    pub kind: EventKind,
    pub timestamp: DateTime<Local>,
    pub frame_index: usize,
}
