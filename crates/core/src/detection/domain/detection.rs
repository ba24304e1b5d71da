/// A candidate face produced by the classifier.
///
/// `row`/`col` locate the window center, `scale` is the window side in
/// pixels and `q` the accumulated classifier score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    pub row: i32,
    pub col: i32,
    pub scale: i32,
    pub q: f32,
}

impl Detection {
    /// Intersection over union of the two square windows.
    pub fn iou(&self, other: &Detection) -> f64 {
        let (r1, c1, s1) = (self.row as f64, self.col as f64, self.scale as f64);
        let (r2, c2, s2) = (other.row as f64, other.col as f64, other.scale as f64);

        let over_row = ((r1 + s1 / 2.0).min(r2 + s2 / 2.0) - (r1 - s1 / 2.0).max(r2 - s2 / 2.0)).max(0.0);
        let over_col = ((c1 + s1 / 2.0).min(c2 + s2 / 2.0) - (c1 - s1 / 2.0).max(c2 - s2 / 2.0)).max(0.0);

        let inter = over_row * over_col;
        let union = s1 * s1 + s2 * s2 - inter;
        if union <= 0.0 {
            return 0.0;
        }
        inter / union
    }
}
