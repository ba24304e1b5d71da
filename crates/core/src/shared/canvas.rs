use std::io::Write;

use image::codecs::jpeg::JpegEncoder;
use image::{ImageResult, RgbImage};

/// Working copy of the source image that accumulates blurred patches.
///
/// Starts as a pixel-identical copy of the source and keeps its dimensions
/// for its whole lifetime.
#[derive(Clone, Debug)]
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    pub fn from_source(source: &RgbImage) -> Self {
        Self {
            image: source.clone(),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Draws `patch` with its top-left corner at `(x, y)`, overwriting
    /// whatever was there. Parts falling outside the canvas are dropped.
    pub fn draw(&mut self, patch: &RgbImage, x: i64, y: i64) {
        image::imageops::replace(&mut self.image, patch, x, y);
    }

    pub fn write_jpeg<W: Write>(&self, writer: W, quality: u8) -> ImageResult<()> {
        let encoder = JpegEncoder::new_with_quality(writer, quality);
        self.image.write_with_encoder(encoder)
    }
}
