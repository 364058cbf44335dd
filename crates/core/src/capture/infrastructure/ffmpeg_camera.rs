use std::thread;
use std::time::Duration;

use ffmpeg_next::format::context::{Context, Input};
use ffmpeg_next::software::scaling;
use ffmpeg_next::util::frame::video::Video;

use crate::capture::domain::frame_source::{FrameSource, FrameSourceError};
use crate::shared::frame::Frame;

/// Pause before polling again when the device has no packet ready.
const RETRY_BACKOFF: Duration = Duration::from_millis(2);

#[cfg(target_os = "macos")]
const INPUT_FORMAT: &str = "avfoundation";
#[cfg(target_os = "windows")]
const INPUT_FORMAT: &str = "vfwcap";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const INPUT_FORMAT: &str = "v4l2";

/// Captures webcam frames through libavdevice and converts them to RGB24.
///
/// No resolution or frame-rate options are passed; the device's defaults
/// are used as-is.
pub struct FfmpegCamera {
    device_index: u32,
    camera: Option<OpenCamera>,
    next_index: usize,
}

struct OpenCamera {
    ictx: Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: Option<scaling::Context>,
    stream_index: usize,
    flushing: bool,
}

// Safety: FfmpegCamera is owned and driven by a single thread at a time.
// The raw pointers inside ffmpeg types are never shared.
unsafe impl Send for FfmpegCamera {}

impl FfmpegCamera {
    pub fn new(device_index: u32) -> Self {
        Self {
            device_index,
            camera: None,
            next_index: 0,
        }
    }

    fn device_name(&self) -> String {
        device_url(self.device_index)
    }

    fn unavailable(&self, reason: impl ToString) -> FrameSourceError {
        FrameSourceError::DeviceUnavailable {
            device: self.device_name(),
            reason: reason.to_string(),
        }
    }
}

impl FrameSource for FfmpegCamera {
    fn open(&mut self) -> Result<(), FrameSourceError> {
        ffmpeg_next::init().map_err(|e| self.unavailable(e))?;
        ffmpeg_next::device::register_all();

        let format = ffmpeg_next::device::input::video()
            .find(|f| f.name() == INPUT_FORMAT)
            .ok_or_else(|| self.unavailable(format!("input format {INPUT_FORMAT} not available")))?;

        let url = self.device_name();
        let context = ffmpeg_next::format::open_with(
            &url,
            &format,
            ffmpeg_next::Dictionary::new(),
        )
        .map_err(|e| self.unavailable(e))?;
        let Context::Input(ictx) = context else {
            return Err(self.unavailable("device opened as output"));
        };

        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or_else(|| self.unavailable("no video stream"))?;
        let stream_index = stream.index();
        let decoder = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())
            .and_then(|ctx| ctx.decoder().video())
            .map_err(|e| self.unavailable(e))?;

        log::info!(
            "Opened camera {url} ({}x{})",
            decoder.width(),
            decoder.height()
        );
        self.camera = Some(OpenCamera {
            ictx,
            decoder,
            scaler: None,
            stream_index,
            flushing: false,
        });
        self.next_index = 0;
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, FrameSourceError> {
        let Some(camera) = self.camera.as_mut() else {
            return Err(FrameSourceError::CaptureFailed("camera not opened".into()));
        };

        let Some(frame) = camera.read_frame(self.next_index)? else {
            return Ok(None);
        };
        self.next_index += 1;
        Ok(Some(frame))
    }

    fn close(&mut self) {
        if self.camera.take().is_some() {
            log::debug!("Released camera {}", self.device_name());
        }
    }
}

impl Drop for FfmpegCamera {
    fn drop(&mut self) {
        self.close();
    }
}

impl OpenCamera {
    fn read_frame(&mut self, index: usize) -> Result<Option<Frame>, FrameSourceError> {
        loop {
            if let Some(frame) = self.try_receive(index)? {
                return Ok(Some(frame));
            }
            if self.flushing {
                return Ok(None);
            }

            let mut packet = ffmpeg_next::Packet::empty();
            if let Err(e) = packet.read(&mut self.ictx) {
                match read_outcome(e) {
                    ReadOutcome::Retry => thread::sleep(RETRY_BACKOFF),
                    ReadOutcome::Flush => {
                        let _ = self.decoder.send_eof();
                        self.flushing = true;
                    }
                    ReadOutcome::Fail(reason) => {
                        return Err(FrameSourceError::CaptureFailed(reason))
                    }
                }
                continue;
            }

            if packet.stream() != self.stream_index {
                continue;
            }
            // A corrupt packet from the device is dropped rather than ending capture.
            if let Err(e) = self.decoder.send_packet(&packet) {
                log::debug!("Dropped undecodable camera packet: {e}");
            }
        }
    }

    fn try_receive(&mut self, index: usize) -> Result<Option<Frame>, FrameSourceError> {
        let mut decoded = Video::empty();
        if self.decoder.receive_frame(&mut decoded).is_err() {
            return Ok(None);
        }

        let width = decoded.width();
        let height = decoded.height();
        let scaler = match self.scaler.take() {
            Some(s) => s,
            None => scaling::Context::get(
                decoded.format(),
                width,
                height,
                ffmpeg_next::format::Pixel::RGB24,
                width,
                height,
                scaling::Flags::BILINEAR,
            )
            .map_err(|e| FrameSourceError::CaptureFailed(e.to_string()))?,
        };
        let scaler = self.scaler.insert(scaler);

        let mut rgb = Video::empty();
        scaler
            .run(&decoded, &mut rgb)
            .map_err(|e| FrameSourceError::CaptureFailed(e.to_string()))?;
        let pixels = packed_rgb(rgb.data(0), rgb.stride(0), width, height);
        Ok(Some(Frame::new(pixels, width, height, 3, index)))
    }
}

fn device_url(index: u32) -> String {
    if cfg!(target_os = "macos") {
        format!("{index}:none")
    } else if cfg!(target_os = "windows") {
        index.to_string()
    } else {
        format!("/dev/video{index}")
    }
}

#[derive(Debug, PartialEq)]
enum ReadOutcome {
    Retry,
    Flush,
    Fail(String),
}

fn read_outcome(error: ffmpeg_next::Error) -> ReadOutcome {
    match error {
        ffmpeg_next::Error::Other {
            errno: ffmpeg_next::util::error::EAGAIN,
        } => ReadOutcome::Retry,
        ffmpeg_next::Error::Eof => ReadOutcome::Flush,
        other => ReadOutcome::Fail(other.to_string()),
    }
}

/// Strips per-row padding (stride > width * 3) from an RGB24 plane.
fn packed_rgb(data: &[u8], stride: usize, width: u32, height: u32) -> Vec<u8> {
    let row_len = width as usize * 3;
    data.chunks(stride)
        .take(height as usize)
        .flat_map(|row| &row[..row_len])
        .copied()
        .collect()
}
