//! YOLO face detector using ONNX Runtime via `ort`.
//!
//! Letterbox preprocessing, single-class confidence filtering and NMS. Only
//! the box and score columns of the head are read; landmark columns of pose
//! exports are ignored.

use std::path::Path;

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

use super::math::{nms, Candidate};
use super::yolo_preprocess::{infer, model_input_size, Letterbox, YoloOutput};

/// Minimum score for a face to count.
pub const FACE_CONFIDENCE: f64 = 0.5;

const NMS_IOU_THRESH: f64 = 0.45;

/// Column holding the face score: `[cx, cy, w, h, conf, ...]`.
const SCORE_COLUMN: usize = 4;

pub struct OnnxYoloFaceDetector {
    session: ort::session::Session,
    input_size: u32,
}

impl OnnxYoloFaceDetector {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?.commit_from_file(model_path)?;
        let input_size = model_input_size(&session);
        log::debug!(
            "Loaded face model {} (input {input_size}px)",
            model_path.display()
        );
        Ok(Self {
            session,
            input_size,
        })
    }
}

impl FaceDetector for OnnxYoloFaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        let mut letterbox = Letterbox::from_frame(frame, self.input_size);
        let input = std::mem::take(&mut letterbox.tensor);
        let output = infer(&mut self.session, input)?;
        parse_faces(&output, &letterbox, frame.width(), frame.height())
    }
}

fn parse_faces(
    output: &YoloOutput,
    letterbox: &Letterbox,
    frame_width: u32,
    frame_height: u32,
) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
    if output.num_features() <= SCORE_COLUMN {
        return Err(format!(
            "Face model output has {} features, expected at least {}",
            output.num_features(),
            SCORE_COLUMN + 1
        )
        .into());
    }

    let candidates = (0..output.num_detections())
        .filter_map(|i| {
            let score = output.value(i, SCORE_COLUMN) as f64;
            if score < FACE_CONFIDENCE {
                return None;
            }
            let bbox = letterbox.to_frame_corners(
                output.value(i, 0) as f64,
                output.value(i, 1) as f64,
                output.value(i, 2) as f64,
                output.value(i, 3) as f64,
            );
            Some(Candidate {
                bbox,
                score,
                class_id: 0,
            })
        })
        .collect();

    Ok(nms(candidates, NMS_IOU_THRESH)
        .into_iter()
        .filter_map(|c| {
            Region::from_corners(
                (c.bbox[0], c.bbox[1], c.bbox[2], c.bbox[3]),
                frame_width,
                frame_height,
                c.score,
            )
        })
        .collect())
}
