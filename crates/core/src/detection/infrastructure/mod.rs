pub mod math;
pub mod onnx_yolo_face_detector;
pub mod onnx_yolo_object_detector;
pub mod yolo_preprocess;
