//! Pixel-intensity-comparison cascade in the "pico" binary format.
//!
//! Each tree node compares two pixels at offsets expressed in 1/256ths of
//! the window scale; a window is accepted when the running leaf-score sum
//! stays above every tree's threshold.

use image::GrayImage;
use thiserror::Error;

use crate::detection::domain::detection::Detection;
use crate::detection::domain::detector_params::DetectorParams;

/// Bytes skipped at the start of a cascade file.
const HEADER_LEN: usize = 8;

/// Deeper trees would need more than 2^16 leaves each; real cascades use 6.
const MAX_TREE_DEPTH: u32 = 16;

#[derive(Error, Debug, PartialEq)]
pub enum CascadeError {
    #[error("cascade data truncated at byte {offset} (needed {needed} more)")]
    Truncated { offset: usize, needed: usize },
    #[error("unsupported tree depth {0}")]
    UnsupportedDepth(u32),
}

/// Unpacked cascade classifier.
#[derive(Clone, Debug)]
pub struct Classifier {
    tree_depth: u32,
    tree_num: u32,
    tree_codes: Vec<i8>,
    tree_pred: Vec<f32>,
    tree_threshold: Vec<f32>,
}

struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], CascadeError> {
        let end = self.pos.checked_add(len).filter(|&end| end <= self.data.len());
        match end {
            Some(end) => {
                let bytes = &self.data[self.pos..end];
                self.pos = end;
                Ok(bytes)
            }
            None => Err(CascadeError::Truncated {
                offset: self.pos,
                needed: len,
            }),
        }
    }

    fn u32_le(&mut self) -> Result<u32, CascadeError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn f32_le(&mut self) -> Result<f32, CascadeError> {
        Ok(f32::from_bits(self.u32_le()?))
    }
}

impl Classifier {
    /// Parses a cascade file.
    pub fn unpack(packet: &[u8]) -> Result<Self, CascadeError> {
        let mut reader = ByteReader {
            data: packet,
            pos: 0,
        };
        reader.take(HEADER_LEN)?;

        let tree_depth = reader.u32_le()?;
        if tree_depth > MAX_TREE_DEPTH {
            return Err(CascadeError::UnsupportedDepth(tree_depth));
        }
        let tree_num = reader.u32_le()?;
        let leaves = 1usize << tree_depth;
        let code_len = 4 * leaves - 4;

        // Capacity is bounded by the data actually present, not by tree_num.
        let per_tree = code_len + 4 * leaves + 4;
        let max_trees = packet.len().saturating_sub(reader.pos) / per_tree.max(1);
        let capacity = (tree_num as usize).min(max_trees);

        let mut tree_codes = Vec::with_capacity(capacity * 4 * leaves);
        let mut tree_pred = Vec::with_capacity(capacity * leaves);
        let mut tree_threshold = Vec::with_capacity(capacity);

        for _ in 0..tree_num {
            // Node 0 is unused; pad it so node `i` lives at `4 * i`.
            tree_codes.extend_from_slice(&[0, 0, 0, 0]);
            tree_codes.extend(reader.take(code_len)?.iter().map(|&b| b as i8));
            for _ in 0..leaves {
                tree_pred.push(reader.f32_le()?);
            }
            tree_threshold.push(reader.f32_le()?);
        }

        Ok(Self {
            tree_depth,
            tree_num,
            tree_codes,
            tree_pred,
            tree_threshold,
        })
    }

    pub fn tree_depth(&self) -> u32 {
        self.tree_depth
    }

    pub fn tree_count(&self) -> u32 {
        self.tree_num
    }

    /// Scores the window of side `scale` centered at `(row, col)`.
    ///
    /// Returns a negative value as soon as one stage rejects the window.
    fn classify_region(&self, row: i32, col: i32, scale: i32, gray: &GrayImage) -> f32 {
        if self.tree_num == 0 {
            return 0.0;
        }
        let leaves = 1usize << self.tree_depth;
        let r = row * 256;
        let c = col * 256;
        let mut root = 0usize;
        let mut out = 0.0f32;

        for i in 0..self.tree_num as usize {
            let mut idx = 1usize;
            for _ in 0..self.tree_depth {
                let node = &self.tree_codes[root + 4 * idx..root + 4 * idx + 4];
                let p1 = pixel_at(
                    gray,
                    (r + node[0] as i32 * scale) >> 8,
                    (c + node[1] as i32 * scale) >> 8,
                );
                let p2 = pixel_at(
                    gray,
                    (r + node[2] as i32 * scale) >> 8,
                    (c + node[3] as i32 * scale) >> 8,
                );
                idx = 2 * idx + usize::from(p1 <= p2);
            }
            out += self.tree_pred[leaves * i + idx - leaves];

            if out <= self.tree_threshold[i] {
                return -1.0;
            }
            root += 4 * leaves;
        }
        out - self.tree_threshold[self.tree_num as usize - 1]
    }

    /// Slides windows of every scale in `params` over the image and returns
    /// each window that passes the whole cascade.
    pub fn run_cascade(&self, gray: &GrayImage, params: &DetectorParams) -> Vec<Detection> {
        let rows = gray.height() as i32;
        let cols = gray.width() as i32;
        let max_size = params.max_size.min(i32::MAX as u32) as i32;
        let mut detections = Vec::new();
        let mut scale = params.min_size.min(i32::MAX as u32) as i32;

        while scale > 0 && scale <= max_size {
            let step = (params.shift_factor * scale as f64).max(1.0) as usize;
            let offset = scale / 2 + 1;

            for row in (offset..=rows - offset).step_by(step) {
                for col in (offset..=cols - offset).step_by(step) {
                    let q = self.classify_region(row, col, scale, gray);
                    if q > 0.0 {
                        detections.push(Detection {
                            row,
                            col,
                            scale,
                            q,
                        });
                    }
                }
            }

            let next = (scale as f64 * params.scale_factor) as i32;
            if next <= scale {
                break;
            }
            scale = next;
        }
        detections
    }

    /// Merges overlapping candidates into one detection per face.
    ///
    /// Candidates are ordered by ascending score. Each unassigned seed then
    /// gathers itself and every later candidate whose IoU with it exceeds
    /// the threshold. Position and scale are averaged (integer), scores are
    /// summed.
    pub fn cluster_detections(&self, detections: &[Detection], iou_threshold: f64) -> Vec<Detection> {
        let mut ordered = detections.to_vec();
        ordered.sort_by(|a, b| a.q.total_cmp(&b.q));

        let mut assigned = vec![false; ordered.len()];
        let mut clusters = Vec::new();

        for (i, seed) in ordered.iter().enumerate() {
            if assigned[i] {
                continue;
            }
            let (mut r, mut c, mut s, mut n) = (0i64, 0i64, 0i64, 0i64);
            let mut q = 0.0f32;
            for (j, other) in ordered.iter().enumerate().skip(i) {
                if seed.iou(other) > iou_threshold {
                    assigned[j] = true;
                    r += other.row as i64;
                    c += other.col as i64;
                    s += other.scale as i64;
                    q += other.q;
                    n += 1;
                }
            }
            if n > 0 {
                clusters.push(Detection {
                    row: (r / n) as i32,
                    col: (c / n) as i32,
                    scale: (s / n) as i32,
                    q,
                });
            }
        }
        clusters
    }
}

fn pixel_at(gray: &GrayImage, row: i32, col: i32) -> u8 {
    let y = row.clamp(0, gray.height() as i32 - 1) as u32;
    let x = col.clamp(0, gray.width() as i32 - 1) as u32;
    gray.get_pixel(x, y).0[0]
}
