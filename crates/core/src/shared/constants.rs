pub const FACE_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const FACE_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

/// COCO object model. No download location is published for the ONNX export,
/// so it must be placed in the models directory.
pub const OBJECT_MODEL_NAME: &str = "yolov8n.onnx";
pub const OBJECT_MODEL_INSTRUCTIONS: &str = "Export it with `pip install ultralytics && \
yolo export model=yolov8n.pt format=onnx` and copy yolov8n.onnx into the models directory \
(--models-dir).";

pub const DEFAULT_CAMERA_INDEX: u32 = 0;
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_MODELS_DIR: &str = "models";
pub const LOG_FILE_NAME: &str = "cheating_log.txt";

/// Terms matched against detected object labels.
pub const PROHIBITED_OBJECTS: &[&str] = &["phone"];

pub const PREVIEW_WINDOW_TITLE: &str = "Cheating Detection";
pub const QUIT_KEY: char = 'q';

pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const SNAPSHOT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
pub const SNAPSHOT_EXTENSION: &str = "jpg";

/// Class names of the 80-class COCO detection set, indexed by class id.
pub const COCO_CLASSES: [&str; 80] = [
    "person", "bicycle", "car", "motorcycle", "airplane", "bus", "train", "truck", "boat",
    "traffic light", "fire hydrant", "stop sign", "parking meter", "bench", "bird", "cat", "dog",
    "horse", "sheep", "cow", "elephant", "bear", "zebra", "giraffe", "backpack", "umbrella",
    "handbag", "tie", "suitcase", "frisbee", "skis", "snowboard", "sports ball", "kite",
    "baseball bat", "baseball glove", "skateboard", "surfboard", "tennis racket", "bottle",
    "wine glass", "cup", "fork", "knife", "spoon", "bowl", "banana", "apple", "sandwich",
    "orange", "broccoli", "carrot", "hot dog", "pizza", "donut", "cake", "chair", "couch",
    "potted plant", "bed", "dining table", "toilet", "tv", "laptop", "mouse", "remote",
    "keyboard", "cell phone", "microwave", "oven", "toaster", "sink", "refrigerator", "book",
    "clock", "vase", "scissors", "teddy bear", "hair drier", "toothbrush",
];
