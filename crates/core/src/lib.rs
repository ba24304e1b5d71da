//! Face redaction for single-image function invocations.
//!
//! One request payload in, one [`Response`] out: the payload is resolved to
//! JPEG/PNG bytes, faces are located with a pixel-comparison cascade, each
//! qualifying face is replaced by a blurred copy of itself, and the result
//! is returned as a JPEG or as JSON bundling the face rectangles.

pub mod blurring;
pub mod config;
pub mod detection;
pub mod error;
pub mod ingestion;
pub mod pipeline;
pub mod shared;

pub use config::{HandlerConfig, InputMode, OutputMode};
pub use error::HandlerError;
pub use pipeline::blur_image_use_case::BlurImageUseCase;
pub use pipeline::response_formatter::Response;
