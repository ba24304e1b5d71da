use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

use crate::config::OutputMode;
use crate::error::{HandlerError, STATUS_OK};
use crate::shared::constants::{CONTENT_TYPE_JPEG, CONTENT_TYPE_JSON};
use crate::shared::face_rect::FaceRect;

pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

/// What the function host sends back to the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, content_type: &str, body: Vec<u8>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(CONTENT_TYPE_HEADER.to_string(), content_type.to_string());
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn from_error(err: &HandlerError) -> Self {
        Self::new(err.status_code(), CONTENT_TYPE_JSON, err.to_json_body())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE_HEADER).map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Body of the `json_image` response.
#[derive(Serialize)]
pub struct DetectionResult<'a> {
    pub faces: &'a [FaceRect],
    pub image_base64: String,
}

/// Builds the success response for `mode`.
pub fn format_response(
    mode: &OutputMode,
    faces: &[FaceRect],
    image: &[u8],
) -> Result<Response, HandlerError> {
    match mode {
        OutputMode::Image => Ok(Response::new(STATUS_OK, CONTENT_TYPE_JPEG, image.to_vec())),
        OutputMode::JsonImage => {
            let result = DetectionResult {
                faces,
                image_base64: STANDARD.encode(image),
            };
            let body = serde_json::to_vec(&result)?;
            Ok(Response::new(STATUS_OK, CONTENT_TYPE_JSON, body))
        }
        OutputMode::Unrecognized(_) => Ok(Response::new(STATUS_OK, CONTENT_TYPE_JSON, Vec::new())),
    }
}
