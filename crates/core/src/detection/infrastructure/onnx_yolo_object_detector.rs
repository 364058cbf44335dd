//! YOLOv8-style COCO object detector using ONNX Runtime via `ort`.
//!
//! The head has no objectness column: each anchor carries `[cx, cy, w, h]`
//! followed by one score per class, and the best class score is the
//! detection confidence.

use std::path::Path;

use crate::detection::domain::object_detector::{ObjectDetection, ObjectDetector};
use crate::shared::constants::COCO_CLASSES;
use crate::shared::frame::Frame;

use super::math::{nms, Candidate};
use super::yolo_preprocess::{infer, model_input_size, Letterbox, YoloOutput};

/// Minimum class score for an object to count.
pub const OBJECT_CONFIDENCE: f64 = 0.25;

const NMS_IOU_THRESH: f64 = 0.45;

const BOX_COLUMNS: usize = 4;

pub struct OnnxYoloObjectDetector {
    session: ort::session::Session,
    input_size: u32,
    class_names: Vec<String>,
}

impl OnnxYoloObjectDetector {
    /// Loads a COCO-trained model; class ids map to [`COCO_CLASSES`].
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        Self::with_class_names(model_path, COCO_CLASSES.iter().map(|s| s.to_string()).collect())
    }

    pub fn with_class_names(
        model_path: &Path,
        class_names: Vec<String>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?.commit_from_file(model_path)?;
        let input_size = model_input_size(&session);
        log::debug!(
            "Loaded object model {} (input {input_size}px, {} classes)",
            model_path.display(),
            class_names.len()
        );
        Ok(Self {
            session,
            input_size,
            class_names,
        })
    }
}

impl ObjectDetector for OnnxYoloObjectDetector {
    fn detect(
        &mut self,
        frame: &Frame,
    ) -> Result<Vec<ObjectDetection>, Box<dyn std::error::Error>> {
        let mut letterbox = Letterbox::from_frame(frame, self.input_size);
        let input = std::mem::take(&mut letterbox.tensor);
        let output = infer(&mut self.session, input)?;
        parse_objects(&output, &letterbox, &self.class_names)
    }
}

fn parse_objects(
    output: &YoloOutput,
    letterbox: &Letterbox,
    class_names: &[String],
) -> Result<Vec<ObjectDetection>, Box<dyn std::error::Error>> {
    let num_classes = output.num_features().saturating_sub(BOX_COLUMNS);
    if num_classes == 0 {
        return Err(format!(
            "Object model output has {} features, expected box columns plus class scores",
            output.num_features()
        )
        .into());
    }

    let mut candidates = Vec::new();
    for i in 0..output.num_detections() {
        let (class_id, score) = (0..num_classes)
            .map(|c| (c, output.value(i, BOX_COLUMNS + c) as f64))
            .fold((0, f64::MIN), |best, cur| if cur.1 > best.1 { cur } else { best });
        if score < OBJECT_CONFIDENCE {
            continue;
        }
        let bbox = letterbox.to_frame_corners(
            output.value(i, 0) as f64,
            output.value(i, 1) as f64,
            output.value(i, 2) as f64,
            output.value(i, 3) as f64,
        );
        candidates.push(Candidate {
            bbox,
            score,
            class_id,
        });
    }

    Ok(nms(candidates, NMS_IOU_THRESH)
        .into_iter()
        .map(|c| ObjectDetection {
            class_id: c.class_id,
            label: class_names
                .get(c.class_id)
                .cloned()
                .unwrap_or_else(|| format!("class_{}", c.class_id)),
            confidence: c.score,
            bbox: c.bbox,
        })
        .collect())
}
