use thiserror::Error;

use crate::detection::domain::face_detector::DetectionError;
use crate::ingestion::domain::image_fetcher::FetchError;
use crate::ingestion::input_resolver::ResolveError;
use crate::pipeline::redact_faces_use_case::RedactError;

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// Terminal failure of one invocation, carrying the caller-facing message.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Empty request received")]
    EmptyInput,
    #[error("Failed to download image: {0}")]
    Download(#[source] FetchError),
    #[error("Failed to read image data: {0}")]
    ReadBody(#[source] FetchError),
    #[error("Only JPEG or PNG images are supported")]
    UnsupportedContentType(String),
    #[error("Cascade file not found: {0}")]
    CascadeNotFound(#[source] DetectionError),
    #[error("Face detection failed: {0}")]
    Detection(#[source] DetectionError),
    #[error("Failed to process image: {0}")]
    Redaction(#[from] RedactError),
    #[error("Failed to encode response: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HandlerError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::EmptyInput | Self::Download(_) | Self::UnsupportedContentType(_) => {
                STATUS_BAD_REQUEST
            }
            Self::ReadBody(_)
            | Self::CascadeNotFound(_)
            | Self::Detection(_)
            | Self::Redaction(_)
            | Self::Serialization(_) => STATUS_INTERNAL_ERROR,
        }
    }

    /// `{"error": "<message>"}`.
    pub fn to_json_body(&self) -> Vec<u8> {
        serde_json::json!({ "error": self.to_string() })
            .to_string()
            .into_bytes()
    }
}

impl From<ResolveError> for HandlerError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::EmptyInput => Self::EmptyInput,
            ResolveError::Fetch(e @ FetchError::Request { .. }) => Self::Download(e),
            ResolveError::Fetch(e @ FetchError::Body { .. }) => Self::ReadBody(e),
            ResolveError::UnsupportedContentType(t) => Self::UnsupportedContentType(t),
        }
    }
}

impl From<DetectionError> for HandlerError {
    fn from(err: DetectionError) -> Self {
        match err {
            DetectionError::ModelNotFound(_) => Self::CascadeNotFound(err),
            other => Self::Detection(other),
        }
    }
}
