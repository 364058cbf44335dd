use thiserror::Error;

use crate::capture::domain::frame_source::{FrameSource, FrameSourceError};
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::object_detector::ObjectDetector;
use crate::detection::domain::prohibited_labels::ProhibitedLabels;
use crate::events::domain::detection_event::{DetectionEvent, EventKind};
use crate::events::domain::event_logger::EventLogger;
use crate::events::domain::snapshot_writer::SnapshotWriter;
use crate::monitor::monitor_report::{MonitorReport, StopReason};
use crate::preview::domain::preview_surface::PreviewSurface;
use crate::shared::clock::{Clock, SystemClock};
use crate::shared::constants::PROHIBITED_OBJECTS;
use crate::shared::frame::Frame;

/// Errors that end monitoring before the first cycle.
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error(transparent)]
    Source(#[from] FrameSourceError),
}

/// A detector call that failed; contained to the cycle it happened in.
#[derive(Error, Debug)]
#[error("Error in {detector} detection: {source}")]
pub struct DetectionFailure {
    pub detector: &'static str,
    #[source]
    pub source: Box<dyn std::error::Error>,
}

/// Polls the camera and records an event whenever a frame shows more than
/// one face or a prohibited object.
///
/// Each cycle is capture → face check → object check → preview → stop
/// check. Detector and write failures are logged and the cycle carries on;
/// only the frame source can end the loop early. The source and preview are
/// released on every exit path, including unwinding.
pub struct MonitorLoop {
    source: Box<dyn FrameSource>,
    face_detector: Box<dyn FaceDetector>,
    object_detector: Box<dyn ObjectDetector>,
    event_logger: Box<dyn EventLogger>,
    snapshot_writer: Box<dyn SnapshotWriter>,
    preview: Box<dyn PreviewSurface>,
    prohibited: ProhibitedLabels,
    clock: Box<dyn Clock>,
    report: MonitorReport,
}

impl MonitorLoop {
    pub fn new(
        source: Box<dyn FrameSource>,
        face_detector: Box<dyn FaceDetector>,
        object_detector: Box<dyn ObjectDetector>,
        event_logger: Box<dyn EventLogger>,
        snapshot_writer: Box<dyn SnapshotWriter>,
        preview: Box<dyn PreviewSurface>,
    ) -> Self {
        Self {
            source,
            face_detector,
            object_detector,
            event_logger,
            snapshot_writer,
            preview,
            prohibited: ProhibitedLabels::new(PROHIBITED_OBJECTS.iter().copied()),
            clock: Box::new(SystemClock),
            report: MonitorReport::default(),
        }
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Runs until the operator quits, the stream ends, or a capture fails.
    ///
    /// Only a device that cannot be opened is returned as an error; every
    /// other stop is reported through [`MonitorReport::stop_reason`].
    pub fn run(&mut self) -> Result<MonitorReport, MonitorError> {
        self.report = MonitorReport::default();

        if let Err(e) = self.source.open() {
            self.release();
            return Err(e.into());
        }
        log::info!("Monitoring started");

        let reason = self.run_cycles();
        self.release();

        log::info!("Monitoring stopped ({:?}): {}", reason, self.report);
        self.report.stop_reason = Some(reason);
        Ok(self.report.clone())
    }

    fn run_cycles(&mut self) -> StopReason {
        loop {
            let frame = match self.source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    log::info!("Camera stream ended");
                    return StopReason::StreamEnded;
                }
                Err(e) => {
                    log::error!("{e}");
                    return StopReason::CaptureFailed(e.to_string());
                }
            };

            let events = self.process_frame(&frame);
            if !events.is_empty() {
                log::debug!("Frame {}: {} events", frame.index(), events.len());
            }

            if let Err(e) = self.preview.render(&frame) {
                log::warn!("Preview render failed: {e}");
            }
            self.report.cycles += 1;

            if self.preview.stop_requested() {
                log::info!("Stop requested by operator");
                return StopReason::OperatorQuit;
            }
        }
    }

    /// Runs both checks on one frame and records any events it triggers.
    pub fn process_frame(&mut self, frame: &Frame) -> Vec<DetectionEvent> {
        let mut events = Vec::new();

        match self.face_detector.detect(frame) {
            Ok(faces) => {
                log::debug!("Frame {}: {} faces", frame.index(), faces.len());
                if faces.len() > 1 {
                    events.push(self.emit(EventKind::MultipleFaces, frame));
                }
            }
            Err(source) => self.contain(DetectionFailure {
                detector: "face",
                source,
            }),
        }

        match self.object_detector.detect(frame) {
            Ok(objects) => {
                if let Some(hit) = self.prohibited.first_match(&objects) {
                    log::debug!(
                        "Frame {}: prohibited object '{}' ({:.2})",
                        frame.index(),
                        hit.label,
                        hit.confidence
                    );
                    events.push(self.emit(EventKind::ProhibitedObject, frame));
                }
            }
            Err(source) => self.contain(DetectionFailure {
                detector: "object",
                source,
            }),
        }

        events
    }

    fn contain(&mut self, failure: DetectionFailure) {
        self.report.detection_failures += 1;
        log::error!("{failure}");
    }

    /// Writes the log entry, then the snapshot. Either write may fail
    /// without preventing the other.
    fn emit(&mut self, kind: EventKind, frame: &Frame) -> DetectionEvent {
        let event = DetectionEvent {
            kind,
            timestamp: self.clock.now(),
            frame_index: frame.index(),
        };
        log::warn!("{} (frame {})", kind.description(), frame.index());

        if let Err(e) = self.event_logger.record(event.timestamp, kind.description()) {
            self.report.write_failures += 1;
            log::error!("Failed to append to event log: {e}");
        }
        match self
            .snapshot_writer
            .save(frame, kind.snapshot_label(), event.timestamp)
        {
            Ok(path) => log::info!("Saved snapshot {}", path.display()),
            Err(e) => {
                self.report.write_failures += 1;
                log::error!("Failed to save {} snapshot: {e}", kind.snapshot_label());
            }
        }

        self.report.count_event(kind);
        event
    }

    fn release(&mut self) {
        self.source.close();
        self.preview.close();
    }
}

impl Drop for MonitorLoop {
    fn drop(&mut self) {
        self.release();
    }
}
