use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::blurring::domain::patch_blurrer::PatchBlurrer;
use crate::blurring::infrastructure::stack_blurrer::StackBlurrer;
use crate::config::HandlerConfig;
use crate::detection::domain::detector_params::DetectorParams;
use crate::detection::domain::face_detector::DetectorLoader;
use crate::detection::infrastructure::cascade_face_detector::CascadeModelLoader;
use crate::error::HandlerError;
use crate::ingestion::domain::image_fetcher::ImageFetcher;
use crate::ingestion::infrastructure::http_image_fetcher::HttpImageFetcher;
use crate::ingestion::input_resolver::InputResolver;
use crate::pipeline::detect_faces_use_case::{DetectFacesUseCase, DetectedImage};
use crate::pipeline::redact_faces_use_case::RedactFacesUseCase;
use crate::pipeline::response_formatter::{format_response, Response};

/// Single-request pipeline: resolve → detect → redact → format.
///
/// Each stage either hands its output to the next or ends the request
/// with an error response. Nothing survives between calls to [`handle`].
///
/// [`handle`]: BlurImageUseCase::handle
pub struct BlurImageUseCase {
    resolver: InputResolver,
    detect: DetectFacesUseCase,
    redact: RedactFacesUseCase,
}

impl BlurImageUseCase {
    pub fn new(
        fetcher: Box<dyn ImageFetcher>,
        loader: Box<dyn DetectorLoader>,
        blurrer: Box<dyn PatchBlurrer>,
        scratch_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            resolver: InputResolver::new(fetcher),
            detect: DetectFacesUseCase::new(loader),
            redact: RedactFacesUseCase::new(blurrer, scratch_dir),
        }
    }

    /// Production wiring: HTTP fetcher, on-disk cascade, stack blur, system
    /// temp directory.
    pub fn with_cascade(cascade_path: &Path) -> Self {
        Self::new(
            Box::new(HttpImageFetcher::new()),
            Box::new(CascadeModelLoader::new(cascade_path, DetectorParams::default())),
            Box::new(StackBlurrer::new()),
            std::env::temp_dir(),
        )
    }

    /// Runs one invocation. Failures become the JSON error response.
    pub fn handle(&self, request: &[u8], config: &HandlerConfig) -> Response {
        match self.execute(request, config) {
            Ok(response) => response,
            Err(err) => Response::from_error(&err),
        }
    }

    pub fn execute(&self, request: &[u8], config: &HandlerConfig) -> Result<Response, HandlerError> {
        let started = Instant::now();
        let resolved = self.resolver.resolve(request, config.input_mode)?;

        let DetectedImage {
            source,
            canvas,
            detections,
        } = self.detect.execute(resolved.bytes())?;
        log::debug!("Detection finished after {:?}", started.elapsed());

        if !config.output_mode.renders_image() {
            return format_response(&config.output_mode, &[], &[]);
        }

        let redaction = self.redact.execute(&source, canvas, &detections)?;
        log::debug!("Redaction finished after {:?}", started.elapsed());

        format_response(&config.output_mode, &redaction.faces, &redaction.image)
    }
}
