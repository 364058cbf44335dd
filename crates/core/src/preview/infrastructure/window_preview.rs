use opencv::core::{self, Mat};
use opencv::highgui;
use opencv::imgproc;

use crate::preview::domain::preview_surface::PreviewSurface;
use crate::shared::constants::{PREVIEW_WINDOW_TITLE, QUIT_KEY};
use crate::shared::frame::Frame;

/// How long each cycle waits for a key press.
const KEY_WAIT_MS: i32 = 1;

/// Live preview in an OpenCV highgui window; `q` stops monitoring.
pub struct WindowPreview {
    title: String,
    open: bool,
    last_key: i32,
}

impl WindowPreview {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        highgui::named_window(PREVIEW_WINDOW_TITLE, highgui::WINDOW_AUTOSIZE)?;
        Ok(Self {
            title: PREVIEW_WINDOW_TITLE.to_string(),
            open: true,
            last_key: -1,
        })
    }
}

impl PreviewSurface for WindowPreview {
    fn render(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        // Mat borrows the frame's buffer; it must not outlive `frame`.
        let rgb = unsafe {
            Mat::new_rows_cols_with_data_unsafe(
                frame.height() as i32,
                frame.width() as i32,
                core::CV_8UC3,
                frame.data().as_ptr() as *mut core::c_void,
                core::Mat_AUTO_STEP,
            )?
        };
        let mut bgr = Mat::default();
        imgproc::cvt_color(&rgb, &mut bgr, imgproc::COLOR_RGB2BGR, 0)?;
        highgui::imshow(&self.title, &bgr)?;

        self.last_key = highgui::wait_key(KEY_WAIT_MS)?;
        Ok(())
    }

    fn stop_requested(&mut self) -> bool {
        self.last_key >= 0 && (self.last_key & 0xFF) == QUIT_KEY as i32
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            if let Err(e) = highgui::destroy_window(&self.title) {
                log::warn!("Failed to close preview window: {e}");
            }
        }
    }
}

impl Drop for WindowPreview {
    fn drop(&mut self) {
        self.close();
    }
}
