use crate::ingestion::domain::image_fetcher::{FetchError, ImageFetcher};

/// Blocking HTTP GET via `reqwest`.
///
/// Non-success status codes are not treated as errors; the body is returned
/// as-is and left to content sniffing.
pub struct HttpImageFetcher {
    client: reqwest::blocking::Client,
}

impl HttpImageFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for HttpImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                source: Box::new(e),
            })?;
        log::debug!("GET {url} -> {}", response.status());

        let body = response.bytes().map_err(|e| FetchError::Body {
            url: url.to_string(),
            source: Box::new(e),
        })?;
        Ok(body.to_vec())
    }
}
