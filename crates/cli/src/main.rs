use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use proctor_core::capture::infrastructure::ffmpeg_camera::FfmpegCamera;
use proctor_core::detection::domain::face_detector::FaceDetector;
use proctor_core::detection::domain::object_detector::ObjectDetector;
use proctor_core::detection::infrastructure::onnx_yolo_face_detector::OnnxYoloFaceDetector;
use proctor_core::detection::infrastructure::onnx_yolo_object_detector::OnnxYoloObjectDetector;
use proctor_core::events::infrastructure::file_event_logger::FileEventLogger;
use proctor_core::events::infrastructure::jpeg_snapshot_writer::JpegSnapshotWriter;
use proctor_core::monitor::monitor_loop::MonitorLoop;
use proctor_core::monitor::monitor_report::StopReason;
use proctor_core::preview::domain::preview_surface::PreviewSurface;
use proctor_core::preview::infrastructure::headless_preview::HeadlessPreview;
use proctor_core::shared::constants::{
    DEFAULT_CAMERA_INDEX, DEFAULT_LOG_DIR, DEFAULT_MODELS_DIR, FACE_MODEL_NAME, FACE_MODEL_URL,
    OBJECT_MODEL_INSTRUCTIONS, OBJECT_MODEL_NAME,
};
use proctor_core::shared::model_resolver::{self, ModelOrigin};

/// Watches a webcam and records frames showing extra faces or a phone.
#[derive(Parser)]
#[command(name = "proctor")]
struct Cli {
    /// Camera device index.
    #[arg(long, default_value_t = DEFAULT_CAMERA_INDEX)]
    device: u32,

    /// Directory for the event log and snapshots.
    #[arg(long, default_value = DEFAULT_LOG_DIR)]
    log_dir: PathBuf,

    /// Directory searched for model files not found in the cache.
    /// yolov8n.onnx must be placed here (`yolo export model=yolov8n.pt format=onnx`).
    #[arg(long, default_value = DEFAULT_MODELS_DIR)]
    models_dir: PathBuf,

    /// Read the quit key from stdin instead of opening a preview window.
    /// Builds without the `preview-window` feature always run this way.
    #[arg(long)]
    headless: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let face_detector = build_face_detector(&cli.models_dir)?;
    let object_detector = build_object_detector(&cli.models_dir)?;
    let event_logger = FileEventLogger::new(&cli.log_dir)?;
    let snapshot_writer = JpegSnapshotWriter::new(&cli.log_dir)?;
    let preview = build_preview(cli.headless)?;

    log::info!(
        "Camera {}, writing events to {}",
        cli.device,
        event_logger.path().display()
    );

    let mut monitor = MonitorLoop::new(
        Box::new(FfmpegCamera::new(cli.device)),
        face_detector,
        object_detector,
        Box::new(event_logger),
        Box::new(snapshot_writer),
        preview,
    );
    let report = monitor.run()?;

    if let Some(StopReason::CaptureFailed(reason)) = &report.stop_reason {
        log::warn!("Capture stopped early: {reason}");
    }
    log::info!("Session summary: {report}");
    Ok(())
}

fn build_face_detector(
    models_dir: &Path,
) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {FACE_MODEL_NAME}");
    let model_path = model_resolver::resolve(
        FACE_MODEL_NAME,
        ModelOrigin::Download(FACE_MODEL_URL),
        Some(models_dir),
        Some(Box::new(download_progress)),
    )?;
    Ok(Box::new(OnnxYoloFaceDetector::new(&model_path)?))
}

fn build_object_detector(
    models_dir: &Path,
) -> Result<Box<dyn ObjectDetector>, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {OBJECT_MODEL_NAME}");
    let model_path = model_resolver::resolve(
        OBJECT_MODEL_NAME,
        ModelOrigin::Manual {
            instructions: OBJECT_MODEL_INSTRUCTIONS,
        },
        Some(models_dir),
        None,
    )?;
    Ok(Box::new(OnnxYoloObjectDetector::new(&model_path)?))
}

#[cfg(feature = "preview-window")]
fn build_preview(headless: bool) -> Result<Box<dyn PreviewSurface>, Box<dyn std::error::Error>> {
    use proctor_core::preview::infrastructure::window_preview::WindowPreview;
    use proctor_core::shared::constants::QUIT_KEY;

    if headless {
        return Ok(headless_preview());
    }
    log::info!("Press '{QUIT_KEY}' in the preview window to stop");
    Ok(Box::new(WindowPreview::new()?))
}

#[cfg(not(feature = "preview-window"))]
fn build_preview(_headless: bool) -> Result<Box<dyn PreviewSurface>, Box<dyn std::error::Error>> {
    log::info!("Built without the preview-window feature; no preview window will open");
    Ok(headless_preview())
}

fn headless_preview() -> Box<dyn PreviewSurface> {
    Box::new(HeadlessPreview::from_stdin())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.log_dir.exists() && !cli.log_dir.is_dir() {
        return Err(format!(
            "Log directory is not a directory: {}",
            cli.log_dir.display()
        )
        .into());
    }
    if cli.models_dir.exists() && !cli.models_dir.is_dir() {
        return Err(format!(
            "Models directory is not a directory: {}",
            cli.models_dir.display()
        )
        .into());
    }
    Ok(())
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face detection model... {pct}%");
        if downloaded >= total {
            eprintln!();
        }
    } else {
        eprint!("\rDownloading face detection model... {downloaded} bytes");
    }
}
