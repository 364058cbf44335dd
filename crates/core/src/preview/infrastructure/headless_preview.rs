use std::io::{BufRead, BufReader, Read};
use std::thread;

use crossbeam_channel::{Receiver, TryRecvError};

use crate::preview::domain::preview_surface::PreviewSurface;
use crate::shared::constants::QUIT_KEY;
use crate::shared::frame::Frame;

/// Preview for machines without a display.
///
/// Frames are not drawn. A reader thread watches operator input and a line
/// consisting of the quit key (`q`) requests a stop. End of input leaves
/// monitoring running.
pub struct HeadlessPreview {
    stop_rx: Option<Receiver<()>>,
}

impl HeadlessPreview {
    /// Watches the process's standard input.
    pub fn from_stdin() -> Self {
        Self::from_reader(std::io::stdin())
    }

    pub fn from_reader<R: Read + Send + 'static>(input: R) -> Self {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let spawned = thread::Builder::new()
            .name("preview-input".into())
            .spawn(move || {
                for line in BufReader::new(input).lines() {
                    let Ok(line) = line else { break };
                    if is_quit(&line) {
                        let _ = tx.send(());
                        break;
                    }
                }
            });
        let stop_rx = match spawned {
            Ok(_) => Some(rx),
            Err(e) => {
                log::warn!("Operator input unavailable, quit key disabled: {e}");
                None
            }
        };
        log::info!("Headless preview: type '{QUIT_KEY}' and press Enter to stop");
        Self {
            stop_rx,
        }
    }
}

fn is_quit(line: &str) -> bool {
    let mut chars = line.trim().chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c == QUIT_KEY)
}

impl PreviewSurface for HeadlessPreview {
    fn render(&mut self, _frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }

    fn stop_requested(&mut self) -> bool {
        let Some(rx) = self.stop_rx.as_ref() else {
            return false;
        };
        match rx.try_recv() {
            Ok(()) => true,
            Err(TryRecvError::Empty) => false,
            // Input ended without a quit line
            Err(TryRecvError::Disconnected) => {
                self.stop_rx = None;
                false
            }
        }
    }

    fn close(&mut self) {
        // The reader thread may be blocked on stdin; it is detached and ends
        // with the process.
        self.stop_rx = None;
    }
}
