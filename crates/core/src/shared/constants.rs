/// Well-known location of the pre-trained face cascade inside the function image.
pub const DEFAULT_CASCADE_PATH: &str = "/home/app/data/facefinder";

/// Detections must score strictly above this to be redacted.
pub const QUALITY_THRESHOLD: f32 = 5.0;

/// Blur radius as a fraction of the region width.
pub const BLUR_RADIUS_FACTOR: f64 = 0.1;

/// JPEG quality used for the redacted output.
pub const OUTPUT_JPEG_QUALITY: u8 = 100;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_JPEG: &str = "image/jpeg";
