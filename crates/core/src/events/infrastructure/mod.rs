pub mod file_event_logger;
pub mod jpeg_snapshot_writer;
