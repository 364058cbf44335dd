pub mod detection_event;
pub mod event_logger;
pub mod snapshot_writer;
