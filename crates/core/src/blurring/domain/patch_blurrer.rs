use image::RgbImage;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum BlurError {
    #[error("cannot blur an empty {width}x{height} patch")]
    EmptyPatch { width: u32, height: u32 },
}

/// Domain interface for blurring an extracted image patch.
///
/// Returns a new image of the same dimensions; the input is left untouched.
pub trait PatchBlurrer {
    fn blur(&self, patch: &RgbImage, radius: u32) -> Result<RgbImage, BlurError>;
}
