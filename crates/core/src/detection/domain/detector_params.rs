use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum InvalidParams {
    #[error("min_size must be positive")]
    ZeroMinSize,
    #[error("min_size {min} exceeds max_size {max}")]
    EmptyScaleRange { min: u32, max: u32 },
    #[error("scale_factor must be greater than 1.0, got {0}")]
    NonGrowingScale(f64),
    #[error("shift_factor must be positive, got {0}")]
    NonPositiveShift(f64),
    #[error("iou_threshold must be within 0.0..=1.0, got {0}")]
    IouOutOfRange(f64),
}

/// Cascade scan tuning, fixed per deployment.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorParams {
    pub min_size: u32,
    pub max_size: u32,
    pub shift_factor: f64,
    pub scale_factor: f64,
    pub iou_threshold: f64,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            min_size: 20,
            max_size: 2000,
            shift_factor: 0.1,
            scale_factor: 1.1,
            iou_threshold: 0.18,
        }
    }
}

impl DetectorParams {
    /// Rejects values under which the multi-scale scan would never terminate
    /// or cluster nothing.
    pub fn validate(&self) -> Result<(), InvalidParams> {
        if self.min_size == 0 {
            return Err(InvalidParams::ZeroMinSize);
        }
        if self.min_size > self.max_size {
            return Err(InvalidParams::EmptyScaleRange {
                min: self.min_size,
                max: self.max_size,
            });
        }
        if self.scale_factor.is_nan() || self.scale_factor <= 1.0 {
            return Err(InvalidParams::NonGrowingScale(self.scale_factor));
        }
        if self.shift_factor.is_nan() || self.shift_factor <= 0.0 {
            return Err(InvalidParams::NonPositiveShift(self.shift_factor));
        }
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(InvalidParams::IouOutOfRange(self.iou_threshold));
        }
        Ok(())
    }
}
