use crate::detection::domain::detection::Detection;

/// Keeps detections scoring strictly above `threshold`, preserving order.
pub fn filter_by_quality(detections: &[Detection], threshold: f32) -> Vec<Detection> {
    detections
        .iter()
        .filter(|d| d.q > threshold)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::QUALITY_THRESHOLD;
    use rstest::rstest;

    fn with_q(q: f32) -> Detection {
        Detection {
            row: 10,
            col: 10,
            scale: 20,
            q,
        }
    }

    #[rstest]
    #[case::at_threshold(5.0, false)]
    #[case::just_above(5.0001, true)]
    #[case::below(4.9, false)]
    #[case::negative(-1.0, false)]
    #[case::well_above(42.0, true)]
    fn test_threshold_is_exclusive(#[case] q: f32, #[case] kept: bool) {
        let result = filter_by_quality(&[with_q(q)], QUALITY_THRESHOLD);
        assert_eq!(result.len(), usize::from(kept));
    }

    #[test]
    fn test_preserves_order() {
        let dets = vec![
            Detection { row: 1, col: 1, scale: 20, q: 9.0 },
            Detection { row: 2, col: 2, scale: 20, q: 1.0 },
            Detection { row: 3, col: 3, scale: 20, q: 6.0 },
        ];
        let result = filter_by_quality(&dets, QUALITY_THRESHOLD);
        assert_eq!(result, vec![dets[0], dets[2]]);
    }

    #[test]
    fn test_empty() {
        assert!(filter_by_quality(&[], QUALITY_THRESHOLD).is_empty());
    }
}
