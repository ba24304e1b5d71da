pub mod cascade_face_detector;
pub mod pico_classifier;
