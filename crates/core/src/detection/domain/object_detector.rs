use crate::shared::frame::Frame;

/// One detected object instance.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectDetection {
    pub class_id: usize,
    /// Class name of this instance, e.g. `"cell phone"`.
    pub label: String,
    pub confidence: f64,
    /// `[x1, y1, x2, y2]` in frame pixel coordinates.
    pub bbox: [f64; 4],
}

/// Domain interface for labeled object detection.
pub trait ObjectDetector: Send {
    fn detect(&mut self, frame: &Frame)
        -> Result<Vec<ObjectDetection>, Box<dyn std::error::Error>>;
}
