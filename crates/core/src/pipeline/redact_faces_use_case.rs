use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use image::RgbImage;
use thiserror::Error;

use crate::blurring::domain::patch_blurrer::{BlurError, PatchBlurrer};
use crate::detection::domain::detection::Detection;
use crate::pipeline::region_filter::filter_by_quality;
use crate::shared::canvas::Canvas;
use crate::shared::constants::{BLUR_RADIUS_FACTOR, OUTPUT_JPEG_QUALITY, QUALITY_THRESHOLD};
use crate::shared::face_rect::FaceRect;
use crate::shared::sub_image::SubImager;

#[derive(Error, Debug)]
pub enum RedactError {
    #[error("failed to blur face: {0}")]
    Blur(#[from] BlurError),
    #[error("failed to create output file: {0}")]
    CreateScratch(#[source] io::Error),
    #[error("failed to encode output image: {0}")]
    Encode(#[source] image::ImageError),
    #[error("failed to write output file: {0}")]
    WriteScratch(#[source] io::Error),
    #[error("failed to read output file: {0}")]
    ReadScratch(#[source] io::Error),
}

/// Rectangles of the redacted faces plus the final JPEG.
#[derive(Clone, Debug)]
pub struct Redaction {
    pub faces: Vec<FaceRect>,
    pub image: Vec<u8>,
}

/// Filters detections, blurs each face patch and encodes the result.
pub struct RedactFacesUseCase {
    blurrer: Box<dyn PatchBlurrer>,
    scratch_dir: PathBuf,
}

impl RedactFacesUseCase {
    pub fn new(blurrer: Box<dyn PatchBlurrer>, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            blurrer,
            scratch_dir: scratch_dir.into(),
        }
    }

    /// Patches are cut from `source`, never from `canvas`, so overlapping
    /// faces do not blur already-blurred pixels. Later faces overwrite
    /// earlier ones where they overlap.
    pub fn execute(
        &self,
        source: &RgbImage,
        mut canvas: Canvas,
        detections: &[Detection],
    ) -> Result<Redaction, RedactError> {
        let qualified = filter_by_quality(detections, QUALITY_THRESHOLD);
        let mut faces = Vec::with_capacity(qualified.len());

        for detection in &qualified {
            let rect = FaceRect::from_detection(detection);
            faces.push(rect);

            let Some(patch) = source.sub_image(&rect) else {
                continue;
            };
            let radius = blur_radius(patch.image.width());
            let blurred = self.blurrer.blur(&patch.image, radius)?;
            // Drawn at the clipped patch origin, not the rect corner, so a face
            // crossing the top or left edge stays covered. Same point when in bounds.
            canvas.draw(&blurred, i64::from(patch.x), i64::from(patch.y));
        }
        log::debug!(
            "Redacted {} of {} detections",
            faces.len(),
            detections.len()
        );

        let image = self.encode(&canvas)?;
        Ok(Redaction { faces, image })
    }

    /// JPEG round trip through a scratch file that is removed on drop,
    /// whichever way this function exits.
    fn encode(&self, canvas: &Canvas) -> Result<Vec<u8>, RedactError> {
        let mut scratch = tempfile::Builder::new()
            .prefix("faceblur-")
            .suffix(".jpg")
            .tempfile_in(&self.scratch_dir)
            .map_err(RedactError::CreateScratch)?;

        {
            let mut writer = BufWriter::new(scratch.as_file_mut());
            canvas
                .write_jpeg(&mut writer, OUTPUT_JPEG_QUALITY)
                .map_err(RedactError::Encode)?;
            writer.flush().map_err(RedactError::WriteScratch)?;
        }

        let bytes = fs::read(scratch.path()).map_err(RedactError::ReadScratch)?;
        log::debug!("Encoded {} byte JPEG", bytes.len());
        Ok(bytes)
    }
}

/// `round(width * 0.1)`, halves rounding away from zero.
pub fn blur_radius(width: u32) -> u32 {
    (f64::from(width) * BLUR_RADIUS_FACTOR).round() as u32
}
