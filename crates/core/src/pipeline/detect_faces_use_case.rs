use image::{GrayImage, Luma, RgbImage};

use crate::detection::domain::detection::Detection;
use crate::detection::domain::face_detector::{DetectionError, DetectorLoader};
use crate::shared::canvas::Canvas;

/// Decoded source plus everything the redaction stage needs from detection.
pub struct DetectedImage {
    /// Clean decoded source; patches are always cut from here.
    pub source: RgbImage,
    /// Working copy, pixel-identical to `source` until redaction draws on it.
    pub canvas: Canvas,
    /// Detector output in detector order.
    pub detections: Vec<Detection>,
}

/// Decode → grayscale → detect, loading a fresh detector per call.
pub struct DetectFacesUseCase {
    loader: Box<dyn DetectorLoader>,
}

impl DetectFacesUseCase {
    pub fn new(loader: Box<dyn DetectorLoader>) -> Self {
        Self { loader }
    }

    pub fn execute(&self, image_bytes: &[u8]) -> Result<DetectedImage, DetectionError> {
        let detector = self.loader.load()?;

        let source = image::load_from_memory(image_bytes)?.to_rgb8();
        let gray = to_grayscale(&source);
        let canvas = Canvas::from_source(&source);

        let detections = detector.detect(&gray);
        log::debug!(
            "Detected {} faces in {}x{} image",
            detections.len(),
            source.width(),
            source.height()
        );

        Ok(DetectedImage {
            source,
            canvas,
            detections,
        })
    }
}

/// BT.601 luma, truncated; the intensities the facefinder cascade expects.
pub fn to_grayscale(source: &RgbImage) -> GrayImage {
    GrayImage::from_fn(source.width(), source.height(), |x, y| {
        let [r, g, b] = source.get_pixel(x, y).0;
        let luma = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
        Luma([luma as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::face_detector::FaceDetector;
    use image::{ImageFormat, Rgb};
    use rstest::rstest;
    use std::cell::RefCell;
    use std::io::Cursor;
    use std::path::PathBuf;
    use std::rc::Rc;

    // --- Stubs ---

    struct StubDetector {
        detections: Vec<Detection>,
        seen: Rc<RefCell<Vec<(u32, u32)>>>,
        pixels: Rc<RefCell<Vec<u8>>>,
    }

    impl FaceDetector for StubDetector {
        fn detect(&self, gray: &GrayImage) -> Vec<Detection> {
            self.seen.borrow_mut().push(gray.dimensions());
            if let Some(first) = gray.pixels().next() {
                self.pixels.borrow_mut().push(first.0[0]);
            }
            self.detections.clone()
        }
    }

    struct StubLoader {
        detections: Vec<Detection>,
        missing: bool,
        seen: Rc<RefCell<Vec<(u32, u32)>>>,
        pixels: Rc<RefCell<Vec<u8>>>,
    }

    impl StubLoader {
        fn new(detections: Vec<Detection>) -> Self {
            Self {
                detections,
                missing: false,
                seen: Rc::new(RefCell::new(Vec::new())),
                pixels: Rc::new(RefCell::new(Vec::new())),
            }
        }
    }

    impl DetectorLoader for StubLoader {
        fn load(&self) -> Result<Box<dyn FaceDetector>, DetectionError> {
            if self.missing {
                return Err(DetectionError::ModelNotFound(PathBuf::from("/missing")));
            }
            Ok(Box::new(StubDetector {
                detections: self.detections.clone(),
                seen: self.seen.clone(),
                pixels: self.pixels.clone(),
            }))
        }
    }

    // --- Helpers ---

    fn png_bytes(width: u32, height: u32) -> (RgbImage, Vec<u8>) {
        let img = RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 99]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        (img, buf.into_inner())
    }

    // --- Tests ---

    #[test]
    fn test_canvas_starts_identical_to_source() {
        let (img, bytes) = png_bytes(30, 20);
        let uc = DetectFacesUseCase::new(Box::new(StubLoader::new(vec![])));
        let detected = uc.execute(&bytes).unwrap();
        assert_eq!(detected.source, img);
        assert_eq!(detected.canvas.image(), &img);
    }

    #[test]
    fn test_detector_sees_grayscale_of_same_size() {
        let (_, bytes) = png_bytes(30, 20);
        let loader = StubLoader::new(vec![]);
        let seen = loader.seen.clone();
        DetectFacesUseCase::new(Box::new(loader)).execute(&bytes).unwrap();
        assert_eq!(*seen.borrow(), vec![(30, 20)]);
    }

    #[rstest]
    #[case::red(Rgb([255, 0, 0]), 76)]
    #[case::green(Rgb([0, 255, 0]), 149)]
    #[case::blue(Rgb([0, 0, 255]), 29)]
    #[case::white(Rgb([255, 255, 255]), 255)]
    #[case::skin(Rgb([224, 172, 105]), 179)]
    fn test_grayscale_uses_bt601_weights(#[case] pixel: Rgb<u8>, #[case] expected: u8) {
        let source = RgbImage::from_pixel(2, 2, pixel);
        let gray = to_grayscale(&source);
        assert_eq!(gray.dimensions(), (2, 2));
        assert_eq!(gray.get_pixel(1, 1).0[0], expected);
    }

    #[test]
    fn test_detector_receives_bt601_intensities() {
        let source = RgbImage::from_pixel(4, 4, Rgb([255, 0, 0]));
        let mut buf = Cursor::new(Vec::new());
        source.write_to(&mut buf, ImageFormat::Png).unwrap();

        let loader = StubLoader::new(vec![]);
        let pixels = loader.pixels.clone();
        DetectFacesUseCase::new(Box::new(loader))
            .execute(&buf.into_inner())
            .unwrap();
        assert_eq!(*pixels.borrow(), vec![76]);
    }

    #[test]
    fn test_detections_returned_in_detector_order() {
        let dets = vec![
            Detection { row: 50, col: 10, scale: 20, q: 7.0 },
            Detection { row: 5, col: 5, scale: 10, q: 9.0 },
        ];
        let (_, bytes) = png_bytes(30, 20);
        let uc = DetectFacesUseCase::new(Box::new(StubLoader::new(dets.clone())));
        assert_eq!(uc.execute(&bytes).unwrap().detections, dets);
    }

    #[test]
    fn test_undecodable_image_is_error() {
        let uc = DetectFacesUseCase::new(Box::new(StubLoader::new(vec![])));
        let err = uc.execute(&[0xFF, 0xD8, 0xFF, 0x00]).err().unwrap();
        assert!(matches!(err, DetectionError::ImageDecode(_)));
    }

    #[test]
    fn test_missing_model_reported_before_decoding() {
        let mut loader = StubLoader::new(vec![]);
        loader.missing = true;
        let uc = DetectFacesUseCase::new(Box::new(loader));
        let err = uc.execute(b"garbage").err().unwrap();
        assert!(matches!(err, DetectionError::ModelNotFound(_)));
    }
}
