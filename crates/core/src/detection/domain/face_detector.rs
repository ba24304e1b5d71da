use std::path::PathBuf;

use image::GrayImage;
use thiserror::Error;

use crate::detection::domain::detection::Detection;
use crate::detection::domain::detector_params::InvalidParams;
use crate::detection::infrastructure::pico_classifier::CascadeError;

#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("cascade file not found: {0}")]
    ModelNotFound(PathBuf),
    #[error("failed to read cascade file {path}: {source}")]
    ModelRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to unpack cascade file: {0}")]
    ModelUnpack(#[from] CascadeError),
    #[error("invalid detector parameters: {0}")]
    InvalidParams(#[from] InvalidParams),
    #[error("failed to load image: {0}")]
    ImageDecode(#[from] image::ImageError),
}

/// Domain interface for face detection over a grayscale intensity image.
///
/// Output order is the detector's own; callers must not assume sorting.
pub trait FaceDetector {
    fn detect(&self, gray: &GrayImage) -> Vec<Detection>;
}

/// Produces a ready detector for one invocation.
///
/// Called once per request; nothing is cached between calls.
pub trait DetectorLoader {
    fn load(&self) -> Result<Box<dyn FaceDetector>, DetectionError>;
}
