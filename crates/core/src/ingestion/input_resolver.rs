use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageFormat;
use thiserror::Error;

use crate::config::InputMode;
use crate::ingestion::domain::image_fetcher::{FetchError, ImageFetcher};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("empty request")]
    EmptyInput,
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),
}

/// How the request payload turned into image bytes.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedInput {
    /// Downloaded from the URL in the payload.
    Fetched(Vec<u8>),
    /// The payload was valid base64.
    Decoded(Vec<u8>),
    /// The payload was not base64 and is used verbatim.
    Passthrough(Vec<u8>),
}

impl ResolvedInput {
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Fetched(b) | Self::Decoded(b) | Self::Passthrough(b) => b,
        }
    }
}

/// Encoded image bytes that passed content sniffing.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedImage {
    pub input: ResolvedInput,
    pub format: ImageFormat,
}

impl ResolvedImage {
    pub fn bytes(&self) -> &[u8] {
        self.input.bytes()
    }

    pub fn content_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

/// Turns a raw request payload into validated JPEG/PNG bytes.
pub struct InputResolver {
    fetcher: Box<dyn ImageFetcher>,
}

impl InputResolver {
    pub fn new(fetcher: Box<dyn ImageFetcher>) -> Self {
        Self { fetcher }
    }

    pub fn resolve(&self, raw: &[u8], mode: InputMode) -> Result<ResolvedImage, ResolveError> {
        if raw.is_empty() {
            return Err(ResolveError::EmptyInput);
        }

        let input = match mode {
            InputMode::Url => {
                let url = String::from_utf8_lossy(raw);
                ResolvedInput::Fetched(self.fetcher.fetch(url.trim())?)
            }
            InputMode::Local => decode_local(raw),
        };

        let format = sniff_format(input.bytes())?;
        let resolved = ResolvedImage { input, format };
        log::debug!(
            "Resolved {} input bytes as {}",
            resolved.bytes().len(),
            resolved.content_type()
        );
        Ok(resolved)
    }
}

/// Base64 if the whole payload decodes, otherwise the payload itself.
///
/// Line breaks are ignored so wrapped base64 bodies decode too.
pub fn decode_local(raw: &[u8]) -> ResolvedInput {
    let compact: Vec<u8> = raw
        .iter()
        .copied()
        .filter(|b| *b != b'\r' && *b != b'\n')
        .collect();
    match STANDARD.decode(compact) {
        Ok(decoded) => ResolvedInput::Decoded(decoded),
        Err(_) => ResolvedInput::Passthrough(raw.to_vec()),
    }
}

/// Accepts JPEG and PNG only, judged by leading signature bytes.
pub fn sniff_format(bytes: &[u8]) -> Result<ImageFormat, ResolveError> {
    match image::guess_format(bytes) {
        Ok(format @ (ImageFormat::Jpeg | ImageFormat::Png)) => Ok(format),
        Ok(other) => Err(ResolveError::UnsupportedContentType(
            other.to_mime_type().to_string(),
        )),
        Err(_) => Err(ResolveError::UnsupportedContentType(
            "application/octet-stream".to_string(),
        )),
    }
}
