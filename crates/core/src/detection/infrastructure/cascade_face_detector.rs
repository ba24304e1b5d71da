use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use image::GrayImage;

use crate::detection::domain::detection::Detection;
use crate::detection::domain::detector_params::DetectorParams;
use crate::detection::domain::face_detector::{DetectionError, DetectorLoader, FaceDetector};

use super::pico_classifier::Classifier;

/// Face detector backed by an unpacked pico cascade.
pub struct CascadeFaceDetector {
    classifier: Classifier,
    params: DetectorParams,
}

impl CascadeFaceDetector {
    pub fn new(classifier: Classifier, params: DetectorParams) -> Result<Self, DetectionError> {
        params.validate()?;
        Ok(Self { classifier, params })
    }

    /// Reads and unpacks the cascade at `path`.
    pub fn from_file(path: &Path, params: DetectorParams) -> Result<Self, DetectionError> {
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => DetectionError::ModelNotFound(path.to_path_buf()),
            _ => DetectionError::ModelRead {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        let classifier = Classifier::unpack(&bytes)?;
        log::info!(
            "Loaded cascade {} ({} trees, depth {})",
            path.display(),
            classifier.tree_count(),
            classifier.tree_depth()
        );
        Self::new(classifier, params)
    }
}

impl FaceDetector for CascadeFaceDetector {
    fn detect(&self, gray: &GrayImage) -> Vec<Detection> {
        let raw = self.classifier.run_cascade(gray, &self.params);
        let clustered = self
            .classifier
            .cluster_detections(&raw, self.params.iou_threshold);
        log::debug!(
            "Cascade produced {} raw candidates, {} after clustering",
            raw.len(),
            clustered.len()
        );
        clustered
    }
}

/// Loads the cascade from disk on every call.
pub struct CascadeModelLoader {
    path: PathBuf,
    params: DetectorParams,
}

impl CascadeModelLoader {
    pub fn new(path: impl Into<PathBuf>, params: DetectorParams) -> Self {
        Self {
            path: path.into(),
            params,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DetectorLoader for CascadeModelLoader {
    fn load(&self) -> Result<Box<dyn FaceDetector>, DetectionError> {
        let detector = CascadeFaceDetector::from_file(&self.path, self.params.clone())?;
        Ok(Box::new(detector))
    }
}
