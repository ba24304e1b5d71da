use image::RgbImage;

use crate::blurring::domain::patch_blurrer::{BlurError, PatchBlurrer};

/// Linear-time stack blur.
///
/// Approximates a Gaussian with a triangular kernel of radius `r`: each
/// output pixel is the weighted mean of `2r + 1` neighbours with weights
/// `1, 2, .., r + 1, .., 2, 1`. Edges repeat the border pixel. Runs a
/// horizontal then a vertical pass, each O(pixels) regardless of radius.
pub struct StackBlurrer;

impl StackBlurrer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StackBlurrer {
    fn default() -> Self {
        Self::new()
    }
}

impl PatchBlurrer for StackBlurrer {
    fn blur(&self, patch: &RgbImage, radius: u32) -> Result<RgbImage, BlurError> {
        let (width, height) = patch.dimensions();
        if width == 0 || height == 0 {
            return Err(BlurError::EmptyPatch { width, height });
        }
        let mut out = patch.clone();
        if radius > 0 {
            stack_blur(
                &mut out,
                width as usize,
                height as usize,
                3,
                radius as usize,
            );
        }
        Ok(out)
    }
}

/// Blurs interleaved `channels`-per-pixel data in place.
pub fn stack_blur(data: &mut [u8], width: usize, height: usize, channels: usize, radius: usize) {
    if radius == 0 || width == 0 || height == 0 {
        return;
    }
    let mut line = Vec::with_capacity(width.max(height) * channels);

    for y in 0..height {
        blur_line(data, y * width, width, 1, channels, radius, &mut line);
    }
    for x in 0..width {
        blur_line(data, x, height, width, channels, radius, &mut line);
    }
}

/// Blurs `len` pixels starting at pixel index `first`, `stride` pixels apart.
fn blur_line(
    data: &mut [u8],
    first: usize,
    len: usize,
    stride: usize,
    channels: usize,
    radius: usize,
    line: &mut Vec<u8>,
) {
    line.clear();
    for k in 0..len {
        let base = (first + k * stride) * channels;
        line.extend_from_slice(&data[base..base + channels]);
    }

    let last = len - 1;
    let r = radius as u64;
    let div = (r + 1) * (r + 1);

    for c in 0..channels {
        let px = |k: usize| line[k.min(last) * channels + c] as u64;

        // Stack centered on pixel 0: left half (incl. center) is all px(0).
        let mut sum_out = (r + 1) * px(0);
        let mut sum = px(0) * (r + 1) * (r + 2) / 2;
        let mut sum_in = 0u64;
        for i in 1..=radius {
            let v = px(i);
            sum_in += v;
            sum += v * (r + 1 - i as u64);
        }

        for x in 0..len {
            data[(first + x * stride) * channels + c] = (sum / div) as u8;

            sum -= sum_out;
            sum_out -= px(x.saturating_sub(radius));
            sum_in += px(x + radius + 1);
            sum += sum_in;

            let next = px(x + 1);
            sum_out += next;
            sum_in -= next;
        }
    }
}
