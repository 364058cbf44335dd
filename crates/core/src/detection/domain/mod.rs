pub mod face_detector;
pub mod object_detector;
pub mod prohibited_labels;
