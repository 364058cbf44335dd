//! Input and output plumbing shared by the YOLO ONNX detectors.

use crate::shared::frame::Frame;

/// Fallback model input resolution when the model doesn't specify dimensions.
pub const DEFAULT_INPUT_SIZE: u32 = 640;

/// Gray fill used for letterbox padding (YOLO convention).
const PAD_VALUE: f32 = 114.0 / 255.0;

/// A frame resized into a square NCHW tensor with aspect-preserving padding.
pub struct Letterbox {
    pub tensor: ndarray::Array4<f32>,
    pub scale: f64,
    pub pad_x: u32,
    pub pad_y: u32,
}

impl Letterbox {
    pub fn from_frame(frame: &Frame, target_size: u32) -> Self {
        let fw = frame.width() as f64;
        let fh = frame.height() as f64;
        let target = target_size as f64;

        let scale = (target / fw).min(target / fh);
        let new_w = ((fw * scale).round() as u32).min(target_size);
        let new_h = ((fh * scale).round() as u32).min(target_size);
        let pad_x = (target_size - new_w) / 2;
        let pad_y = (target_size - new_h) / 2;

        let size = target_size as usize;
        let mut tensor = ndarray::Array4::<f32>::from_elem((1, 3, size, size), PAD_VALUE);

        let src = frame.as_ndarray();
        let src_h = frame.height() as usize;
        let src_w = frame.width() as usize;

        // Nearest-neighbor resize into the padded region
        for y in 0..new_h as usize {
            let src_y = ((y as f64 / scale) as usize).min(src_h - 1);
            for x in 0..new_w as usize {
                let src_x = ((x as f64 / scale) as usize).min(src_w - 1);
                let ty = pad_y as usize + y;
                let tx = pad_x as usize + x;
                for c in 0..3 {
                    tensor[[0, c, ty, tx]] = src[[src_y, src_x, c]] as f32 / 255.0;
                }
            }
        }

        Self {
            tensor,
            scale,
            pad_x,
            pad_y,
        }
    }

    /// Maps a center-format box from tensor space back to `[x1, y1, x2, y2]`
    /// in original frame pixels.
    pub fn to_frame_corners(&self, cx: f64, cy: f64, w: f64, h: f64) -> [f64; 4] {
        let px = self.pad_x as f64;
        let py = self.pad_y as f64;
        [
            (cx - w / 2.0 - px) / self.scale,
            (cy - h / 2.0 - py) / self.scale,
            (cx + w / 2.0 - px) / self.scale,
            (cy + h / 2.0 - py) / self.scale,
        ]
    }
}

/// Reads the square input size from an NCHW model input, if static.
pub fn model_input_size(session: &ort::session::Session) -> u32 {
    session
        .inputs()
        .first()
        .and_then(|input| {
            if let ort::value::ValueType::Tensor { ref shape, .. } = input.dtype() {
                if shape.len() >= 4 && shape[2] > 0 {
                    Some(shape[2] as u32)
                } else {
                    None
                }
            } else {
                None
            }
        })
        .unwrap_or(DEFAULT_INPUT_SIZE)
}

/// Runs the session on a letterboxed tensor and returns the first output.
pub fn infer(
    session: &mut ort::session::Session,
    tensor: ndarray::Array4<f32>,
) -> Result<YoloOutput, Box<dyn std::error::Error>> {
    let input_value = ort::value::Tensor::from_array(tensor)?;
    let outputs = session.run(ort::inputs![input_value])?;
    if outputs.len() == 0 {
        return Err("YOLO model produced no outputs".into());
    }
    let array = outputs[0].try_extract_array::<f32>()?;
    YoloOutput::new(array.shape(), array.iter().copied().collect())
}

/// YOLO head output viewed as `num_detections` rows of features.
///
/// Exports come as either `[1, features, detections]` (the usual transposed
/// layout) or `[1, detections, features]`; both are accepted.
#[derive(Debug)]
pub struct YoloOutput {
    data: Vec<f32>,
    num_dets: usize,
    num_feats: usize,
    transposed: bool,
}

impl YoloOutput {
    pub fn new(shape: &[usize], data: Vec<f32>) -> Result<Self, Box<dyn std::error::Error>> {
        if shape.len() != 3 {
            return Err(format!("Unexpected YOLO output shape: {shape:?}").into());
        }
        let transposed = shape[1] < shape[2];
        let (num_dets, num_feats) = if transposed {
            (shape[2], shape[1])
        } else {
            (shape[1], shape[2])
        };
        if data.len() < num_dets * num_feats {
            return Err(format!(
                "YOLO output holds {} values, shape {shape:?} needs {}",
                data.len(),
                num_dets * num_feats
            )
            .into());
        }
        Ok(Self {
            data,
            num_dets,
            num_feats,
            transposed,
        })
    }

    pub fn num_detections(&self) -> usize {
        self.num_dets
    }

    pub fn num_features(&self) -> usize {
        self.num_feats
    }

    pub fn value(&self, det: usize, feat: usize) -> f32 {
        if self.transposed {
            self.data[feat * self.num_dets + det]
        } else {
            self.data[det * self.num_feats + feat]
        }
    }
}
