//! Single-level Haar 2-D DWT-QIM carrier: embeds in the horizontal (cH) then
//! vertical (cV) detail sub-bands of the luma plane. Magic `DWT1`.
//!
//! The Haar analysis/synthesis filter bank here is hand-rolled rather than
//! pulled from an external wavelet crate, no such crate appears anywhere in
//! the surrounding ecosystem and `exrs`'s PIZ wavelet
//! (`compression/piz/wavelet.rs`) hand-rolls its transform the same way.
//! This is a proper separable 1-D Haar filter bank with *symmetric* edge
//! extension (mirroring the final sample on odd lengths), matching the
//! `symmetric` boundary mode wavelet libraries default to. See DESIGN.md for
//! more on the boundary-handling choice.
//!
//! The whole carrier is gated behind the `dwt` feature: when disabled, it
//! advertises capacity 0 and its encode/decode report `feature unavailable`,
//! modeled as an explicit, queryable Cargo feature rather than a
//! module-level availability flag checked at runtime.

use crate::error::StegoError;
use std::path::Path;

const Q: f64 = 14.0;
const SQRT2: f64 = std::f64::consts::SQRT_2;

/// 1-D single-level Haar analysis with symmetric extension: for an odd
/// input length, the final sample is mirrored (duplicated) to pair with
/// itself, giving `ceil(n/2)` outputs instead of requiring the caller to
/// pre-pad.
fn haar_forward_1d(x: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = x.len();
    let out_len = n.div_ceil(2);
    let mut lo = Vec::with_capacity(out_len);
    let mut hi = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let a = x[2 * i];
        let b = if 2 * i + 1 < n { x[2 * i + 1] } else { x[n - 1] };
        lo.push((a + b) / SQRT2);
        hi.push((a - b) / SQRT2);
    }
    (lo, hi)
}

/// Inverse of [`haar_forward_1d`]; `n` is the original (pre-transform)
/// length, needed to know whether the last pair's second sample was a
/// mirrored duplicate to be discarded.
fn haar_inverse_1d(lo: &[f64], hi: &[f64], n: usize) -> Vec<f64> {
    let mut out = vec![0.0; n];
    for i in 0..lo.len() {
        let a = (lo[i] + hi[i]) / SQRT2;
        let b = (lo[i] - hi[i]) / SQRT2;
        out[2 * i] = a;
        if 2 * i + 1 < n {
            out[2 * i + 1] = b;
        }
    }
    out
}

/// A 2-D array stored row-major, with its own shape.
#[derive(Clone)]
struct Grid {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Grid {
    fn new(rows: usize, cols: usize) -> Self {
        Grid {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    fn get(&self, r: usize, c: usize) -> f64 {
        self.data[r * self.cols + c]
    }

    fn set(&mut self, r: usize, c: usize, v: f64) {
        self.data[r * self.cols + c] = v;
    }

    fn row(&self, r: usize) -> Vec<f64> {
        self.data[r * self.cols..(r + 1) * self.cols].to_vec()
    }

    fn col(&self, c: usize) -> Vec<f64> {
        (0..self.rows).map(|r| self.get(r, c)).collect()
    }
}

struct Bands {
    oh: usize,
    ow: usize,
    ca: Grid,
    ch: Grid,
    cv: Grid,
    cd: Grid,
}

/// Vertical-then-horizontal separable forward transform: cH carries
/// horizontal edge energy (low-pass vertical, high-pass horizontal), cV
/// carries vertical edge energy (high-pass vertical, low-pass horizontal).
fn forward(y: &Grid) -> Bands {
    let (h, w) = (y.rows, y.cols);
    let oh = h.div_ceil(2);

    let mut lo_v = Grid::new(oh, w);
    let mut hi_v = Grid::new(oh, w);
    for c in 0..w {
        let (lo, hi) = haar_forward_1d(&y.col(c));
        for r in 0..oh {
            lo_v.set(r, c, lo[r]);
            hi_v.set(r, c, hi[r]);
        }
    }

    let ow = w.div_ceil(2);
    let mut ca = Grid::new(oh, ow);
    let mut ch = Grid::new(oh, ow);
    let mut cv = Grid::new(oh, ow);
    let mut cd = Grid::new(oh, ow);
    for r in 0..oh {
        let (lo, hi) = haar_forward_1d(&lo_v.row(r));
        for c in 0..ow {
            ca.set(r, c, lo[c]);
            ch.set(r, c, hi[c]);
        }
        let (lo, hi) = haar_forward_1d(&hi_v.row(r));
        for c in 0..ow {
            cv.set(r, c, lo[c]);
            cd.set(r, c, hi[c]);
        }
    }

    Bands { oh, ow, ca, ch, cv, cd }
}

fn inverse(bands: &Bands, height: usize, width: usize) -> Grid {
    let (oh, w) = (bands.oh, width);
    let mut lo_v = Grid::new(oh, w);
    let mut hi_v = Grid::new(oh, w);
    for r in 0..oh {
        let row = haar_inverse_1d(&bands.ca.row(r), &bands.ch.row(r), w);
        for c in 0..w {
            lo_v.set(r, c, row[c]);
        }
        let row = haar_inverse_1d(&bands.cv.row(r), &bands.cd.row(r), w);
        for c in 0..w {
            hi_v.set(r, c, row[c]);
        }
    }

    let mut out = Grid::new(height, w);
    for c in 0..w {
        let col = haar_inverse_1d(&lo_v.col(c), &hi_v.col(c), height);
        for r in 0..height {
            out.set(r, c, col[r]);
        }
    }
    out
}

pub fn capacity_bits_for_dims(width: u32, height: u32) -> usize {
    if !dwt_feature_enabled() {
        return 0;
    }
    let oh = (height as usize).div_ceil(2);
    let ow = (width as usize).div_ceil(2);
    oh * ow * 2
}

pub fn capacity_for_dims(width: u32, height: u32) -> usize {
    capacity_bits_for_dims(width, height).saturating_sub(crate::frame::HEADER_BITS) / 8
}

#[cfg(feature = "dwt")]
fn dwt_feature_enabled() -> bool {
    true
}

#[cfg(not(feature = "dwt"))]
fn dwt_feature_enabled() -> bool {
    false
}

#[cfg(feature = "dwt")]
mod imp {
    use super::*;
    use crate::bitstream::BitReader;
    use crate::error::CapacityExceededSnafu;
    use crate::frame::{self, DWT_MAGIC};
    use crate::image_io::{read_luma, write_luma};
    use crate::qim;
    use snafu::ensure;
    use tracing::debug;

    fn luma_to_grid(luma: &crate::image_io::LumaImage) -> Grid {
        Grid {
            rows: luma.height as usize,
            cols: luma.width as usize,
            data: luma.data.iter().map(|&b| b as f64).collect(),
        }
    }

    fn grid_to_luma(grid: &Grid) -> Vec<u8> {
        grid.data
            .iter()
            .map(|&v| v.round().clamp(0.0, 255.0) as u8)
            .collect()
    }

    pub fn capacity(cover_path: &Path) -> Result<usize, StegoError> {
        let img = read_luma(cover_path)?;
        Ok(capacity_for_dims(img.width, img.height))
    }

    pub fn encode(cover_path: &Path, message: &[u8], out_path: &Path) -> Result<(), StegoError> {
        let luma = read_luma(cover_path)?;
        let cap = capacity_for_dims(luma.width, luma.height);
        ensure!(
            message.len() <= cap,
            CapacityExceededSnafu {
                needed: message.len(),
                capacity: cap,
            }
        );

        let grid = luma_to_grid(&luma);
        let mut bands = forward(&grid);
        let bits = frame::build_bits(DWT_MAGIC, message);

        let ch_slots = bands.oh * bands.ow;
        let mut bit_idx = 0;
        for slot in 0..ch_slots {
            if bit_idx >= bits.len() {
                break;
            }
            let r = slot / bands.ow;
            let c = slot % bands.ow;
            let embedded = qim::embed_bit(bands.ch.get(r, c), bits[bit_idx], Q);
            bands.ch.set(r, c, embedded);
            bit_idx += 1;
        }
        for slot in 0..ch_slots {
            if bit_idx >= bits.len() {
                break;
            }
            let r = slot / bands.ow;
            let c = slot % bands.ow;
            let embedded = qim::embed_bit(bands.cv.get(r, c), bits[bit_idx], Q);
            bands.cv.set(r, c, embedded);
            bit_idx += 1;
        }

        let reconstructed = inverse(&bands, grid.rows, grid.cols);
        let out_luma = grid_to_luma(&reconstructed);
        write_luma(out_path, luma.width, luma.height, &out_luma)?;
        debug!(bytes = message.len(), "DWT embed complete");
        Ok(())
    }

    pub fn decode(stego_path: &Path) -> Result<Vec<u8>, StegoError> {
        let luma = read_luma(stego_path)?;
        let grid = luma_to_grid(&luma);
        let bands = forward(&grid);

        let ch_slots = bands.oh * bands.ow;
        let mut bits = Vec::with_capacity(ch_slots * 2);
        for slot in 0..ch_slots {
            let r = slot / bands.ow;
            let c = slot % bands.ow;
            bits.push(qim::extract_bit(bands.ch.get(r, c), Q));
        }
        for slot in 0..ch_slots {
            let r = slot / bands.ow;
            let c = slot % bands.ow;
            bits.push(qim::extract_bit(bands.cv.get(r, c), Q));
        }

        let mut reader = BitReader::new(&bits);
        let msg = frame::parse(&mut reader, DWT_MAGIC)?;
        debug!(bytes = msg.len(), "DWT extract complete");
        Ok(msg)
    }
}

#[cfg(feature = "dwt")]
pub use imp::{capacity, decode, encode};

#[cfg(not(feature = "dwt"))]
pub fn capacity(_cover_path: &Path) -> Result<usize, StegoError> {
    Ok(0)
}

#[cfg(not(feature = "dwt"))]
pub fn encode(_cover_path: &Path, _message: &[u8], _out_path: &Path) -> Result<(), StegoError> {
    Err(StegoError::FeatureUnavailable)
}

#[cfg(not(feature = "dwt"))]
pub fn decode(_stego_path: &Path) -> Result<Vec<u8>, StegoError> {
    Err(StegoError::FeatureUnavailable)
}
