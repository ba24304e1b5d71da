use image::RgbImage;

use crate::shared::face_rect::FaceRect;

/// A rectangular piece cut out of a decoded image, remembering where it came from.
#[derive(Clone, Debug)]
pub struct Patch {
    pub x: u32,
    pub y: u32,
    pub image: RgbImage,
}

/// Capability to extract the part of an image covered by a rectangle.
///
/// The rectangle is intersected with the image bounds first; `None` means
/// the intersection is empty.
pub trait SubImager {
    fn sub_image(&self, rect: &FaceRect) -> Option<Patch>;
}

impl SubImager for RgbImage {
    fn sub_image(&self, rect: &FaceRect) -> Option<Patch> {
        let clipped = rect.clip_to(self.width(), self.height())?;
        let (x, y) = (clipped.x0 as u32, clipped.y0 as u32);
        let patch = image::imageops::crop_imm(
            self,
            x,
            y,
            clipped.width() as u32,
            clipped.height() as u32,
        )
        .to_image();
        Some(Patch { x, y, image: patch })
    }
}
