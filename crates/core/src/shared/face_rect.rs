use serde::Serialize;

use crate::detection::domain::detection::Detection;

/// Axis-aligned face rectangle in canvas pixel coordinates.
///
/// `(x0, y0)` is inclusive, `(x1, y1)` exclusive. Coordinates may fall
/// outside the canvas when a detection sits close to an edge; consumers clip
/// with [`FaceRect::clip_to`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FaceRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl FaceRect {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Square of side `scale` centered on the detection, halving with
    /// truncating integer division.
    pub fn from_detection(detection: &Detection) -> Self {
        let half = detection.scale / 2;
        Self {
            x0: detection.col - half,
            y0: detection.row - half,
            x1: detection.col + half,
            y1: detection.row + half,
        }
    }

    pub fn width(&self) -> i32 {
        (self.x1 - self.x0).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.y1 - self.y0).max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Intersection with a `width` x `height` canvas anchored at the origin.
    ///
    /// Returns `None` when nothing of the rectangle is visible.
    pub fn clip_to(&self, width: u32, height: u32) -> Option<FaceRect> {
        let w = i32::try_from(width).unwrap_or(i32::MAX);
        let h = i32::try_from(height).unwrap_or(i32::MAX);
        let clipped = FaceRect {
            x0: self.x0.clamp(0, w),
            y0: self.y0.clamp(0, h),
            x1: self.x1.clamp(0, w),
            y1: self.y1.clamp(0, h),
        };
        if clipped.is_empty() {
            None
        } else {
            Some(clipped)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn detection(row: i32, col: i32, scale: i32) -> Detection {
        Detection {
            row,
            col,
            scale,
            q: 10.0,
        }
    }

    #[test]
    fn test_from_detection_centered_square() {
        let rect = FaceRect::from_detection(&detection(100, 100, 40));
        assert_eq!(rect, FaceRect::new(80, 80, 120, 120));
    }

    #[test]
    fn test_from_detection_uses_col_for_x_and_row_for_y() {
        let rect = FaceRect::from_detection(&detection(50, 200, 20));
        assert_eq!(rect, FaceRect::new(190, 40, 210, 60));
    }

    #[test]
    fn test_from_detection_odd_scale_truncates_half() {
        // 41 / 2 == 20, so the emitted square is 40 wide.
        let rect = FaceRect::from_detection(&detection(100, 100, 41));
        assert_eq!(rect, FaceRect::new(80, 80, 120, 120));
        assert_eq!(rect.width(), 40);
    }

    #[test]
    fn test_from_detection_near_edge_goes_negative() {
        let rect = FaceRect::from_detection(&detection(5, 5, 20));
        assert_eq!(rect, FaceRect::new(-5, -5, 15, 15));
    }

    #[test]
    fn test_clip_inside_is_identity() {
        let rect = FaceRect::new(10, 10, 50, 50);
        assert_eq!(rect.clip_to(100, 100), Some(rect));
    }

    #[test]
    fn test_clip_at_top_left_edge() {
        let rect = FaceRect::new(-5, -10, 15, 20);
        assert_eq!(rect.clip_to(100, 100), Some(FaceRect::new(0, 0, 15, 20)));
    }

    #[test]
    fn test_clip_at_bottom_right_edge() {
        let rect = FaceRect::new(90, 80, 130, 120);
        assert_eq!(rect.clip_to(100, 100), Some(FaceRect::new(90, 80, 100, 100)));
    }

    #[rstest]
    #[case::left_of_canvas(FaceRect::new(-40, 10, -1, 50))]
    #[case::below_canvas(FaceRect::new(10, 120, 40, 160))]
    #[case::zero_width(FaceRect::new(10, 10, 10, 50))]
    fn test_clip_without_overlap_is_none(#[case] rect: FaceRect) {
        assert_eq!(rect.clip_to(100, 100), None);
    }

    #[test]
    fn test_serializes_as_corner_fields() {
        let json = serde_json::to_string(&FaceRect::new(1, 2, 3, 4)).unwrap();
        assert_eq!(json, r#"{"x0":1,"y0":2,"x1":3,"y1":4}"#);
    }
}
