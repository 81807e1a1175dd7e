//! Block-DCT QIM carrier: embeds in six fixed mid-frequency coefficients of
//! each non-overlapping 8x8 block of the Y (luma) plane. Magic `DCT1`.

use crate::error::{CapacityExceededSnafu, ImageTooSmallForBlockSnafu, StegoError};
use crate::frame::{self, DCT_MAGIC};
use crate::image_io::{read_bgr, write_bgr};
use crate::qim;
use snafu::ensure;
use std::path::Path;
use tracing::debug;

const BLOCK: usize = 8;
/// (row, col) within each 8x8 block, in fixed embedding order.
const POSITIONS: [(usize, usize); 6] = [(3, 3), (4, 3), (3, 4), (2, 3), (3, 2), (4, 4)];
const DELTA: f64 = 12.0;

/// Orthonormal type-II DCT basis: `basis[k][n] = alpha(k) * cos((2n+1)k*pi/16)`.
fn dct_basis() -> [[f64; BLOCK]; BLOCK] {
    let mut basis = [[0.0; BLOCK]; BLOCK];
    for k in 0..BLOCK {
        let alpha = if k == 0 {
            (1.0 / BLOCK as f64).sqrt()
        } else {
            (2.0 / BLOCK as f64).sqrt()
        };
        for n in 0..BLOCK {
            basis[k][n] =
                alpha * (((2 * n + 1) as f64 * k as f64 * std::f64::consts::PI) / (2.0 * BLOCK as f64)).cos();
        }
    }
    basis
}

fn mat_mul(a: &[[f64; BLOCK]; BLOCK], b: &[[f64; BLOCK]; BLOCK]) -> [[f64; BLOCK]; BLOCK] {
    let mut out = [[0.0; BLOCK]; BLOCK];
    for i in 0..BLOCK {
        for j in 0..BLOCK {
            let mut sum = 0.0;
            for k in 0..BLOCK {
                sum += a[i][k] * b[k][j];
            }
            out[i][j] = sum;
        }
    }
    out
}

fn transpose(a: &[[f64; BLOCK]; BLOCK]) -> [[f64; BLOCK]; BLOCK] {
    let mut out = [[0.0; BLOCK]; BLOCK];
    for i in 0..BLOCK {
        for j in 0..BLOCK {
            out[j][i] = a[i][j];
        }
    }
    out
}

/// 2D DCT-II of `block - 128`, separable: `basis * X * basis^T`.
fn forward_dct(block: &[[f64; BLOCK]; BLOCK], basis: &[[f64; BLOCK]; BLOCK], basis_t: &[[f64; BLOCK]; BLOCK]) -> [[f64; BLOCK]; BLOCK] {
    mat_mul(&mat_mul(basis, block), basis_t)
}

/// Inverse of [`forward_dct`]: `basis^T * D * basis` (basis is orthonormal).
fn inverse_dct(coeffs: &[[f64; BLOCK]; BLOCK], basis: &[[f64; BLOCK]; BLOCK], basis_t: &[[f64; BLOCK]; BLOCK]) -> [[f64; BLOCK]; BLOCK] {
    mat_mul(&mat_mul(basis_t, coeffs), basis)
}

fn bgr_to_ycrcb(b: u8, g: u8, r: u8) -> (f64, f64, f64) {
    let (r, g, b) = (r as f64, g as f64, b as f64);
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cr = (r - y) * 0.713 + 128.0;
    let cb = (b - y) * 0.564 + 128.0;
    (y, cr, cb)
}

fn ycrcb_to_bgr(y: f64, cr: f64, cb: f64) -> (u8, u8, u8) {
    let r = y + 1.403 * (cr - 128.0);
    let g = y - 0.714 * (cr - 128.0) - 0.344 * (cb - 128.0);
    let b = y + 1.772 * (cb - 128.0);
    let clip = |v: f64| v.round().clamp(0.0, 255.0) as u8;
    (clip(b), clip(g), clip(r))
}

struct Planes {
    width: u32,
    height: u32,
    y: Vec<f64>,
    cr: Vec<f64>,
    cb: Vec<f64>,
}

fn split_planes(bgr: &crate::image_io::BgrImage) -> Planes {
    let (w, h) = (bgr.width as usize, bgr.height as usize);
    let mut y = vec![0.0; w * h];
    let mut cr = vec![0.0; w * h];
    let mut cb = vec![0.0; w * h];
    for i in 0..w * h {
        let (b, g, r) = (bgr.data[i * 3], bgr.data[i * 3 + 1], bgr.data[i * 3 + 2]);
        let (yy, ccr, ccb) = bgr_to_ycrcb(b, g, r);
        y[i] = yy;
        cr[i] = ccr;
        cb[i] = ccb;
    }
    Planes {
        width: bgr.width,
        height: bgr.height,
        y,
        cr,
        cb,
    }
}

fn join_planes(planes: &Planes) -> Vec<u8> {
    let (w, h) = (planes.width as usize, planes.height as usize);
    let mut out = vec![0u8; w * h * 3];
    for i in 0..w * h {
        let (b, g, r) = ycrcb_to_bgr(planes.y[i], planes.cr[i], planes.cb[i]);
        out[i * 3] = b;
        out[i * 3 + 1] = g;
        out[i * 3 + 2] = r;
    }
    out
}

fn block_dims(width: u32, height: u32) -> (usize, usize) {
    let h8 = (height as usize / BLOCK) * BLOCK;
    let w8 = (width as usize / BLOCK) * BLOCK;
    (h8, w8)
}

pub fn capacity_bits_for_dims(width: u32, height: u32) -> usize {
    let (h8, w8) = block_dims(width, height);
    if h8 < BLOCK || w8 < BLOCK {
        return 0;
    }
    (h8 / BLOCK) * (w8 / BLOCK) * POSITIONS.len()
}

pub fn capacity_for_dims(width: u32, height: u32) -> usize {
    capacity_bits_for_dims(width, height).saturating_sub(frame::HEADER_BITS) / 8
}

pub fn capacity(cover_path: &Path) -> Result<usize, StegoError> {
    let img = read_bgr(cover_path)?;
    Ok(capacity_for_dims(img.width, img.height))
}

fn read_block(y: &[f64], width: usize, row0: usize, col0: usize) -> [[f64; BLOCK]; BLOCK] {
    let mut block = [[0.0; BLOCK]; BLOCK];
    for r in 0..BLOCK {
        for c in 0..BLOCK {
            block[r][c] = y[(row0 + r) * width + (col0 + c)] - 128.0;
        }
    }
    block
}

fn write_block(y: &mut [f64], width: usize, row0: usize, col0: usize, spatial: &[[f64; BLOCK]; BLOCK]) {
    for r in 0..BLOCK {
        for c in 0..BLOCK {
            let v = (spatial[r][c] + 128.0).clamp(0.0, 255.0);
            y[(row0 + r) * width + (col0 + c)] = v;
        }
    }
}

pub fn encode(cover_path: &Path, message: &[u8], out_path: &Path) -> Result<(), StegoError> {
    let bgr = read_bgr(cover_path)?;
    let (h8, w8) = block_dims(bgr.width, bgr.height);
    ensure!(h8 >= BLOCK && w8 >= BLOCK, ImageTooSmallForBlockSnafu);

    let cap = capacity_for_dims(bgr.width, bgr.height);
    ensure!(
        message.len() <= cap,
        CapacityExceededSnafu {
            needed: message.len(),
            capacity: cap,
        }
    );

    let mut planes = split_planes(&bgr);
    let bits = frame::build_bits(DCT_MAGIC, message);
    let width = planes.width as usize;

    let basis = dct_basis();
    let basis_t = transpose(&basis);

    let mut bit_idx = 0;
    'blocks: for block_row in 0..h8 / BLOCK {
        for block_col in 0..w8 / BLOCK {
            if bit_idx >= bits.len() {
                break 'blocks;
            }
            let row0 = block_row * BLOCK;
            let col0 = block_col * BLOCK;
            let spatial = read_block(&planes.y, width, row0, col0);
            let mut coeffs = forward_dct(&spatial, &basis, &basis_t);
            for &(pr, pc) in POSITIONS.iter() {
                if bit_idx >= bits.len() {
                    break;
                }
                coeffs[pr][pc] = qim::embed_bit(coeffs[pr][pc], bits[bit_idx], DELTA);
                bit_idx += 1;
            }
            let spatial_out = inverse_dct(&coeffs, &basis, &basis_t);
            write_block(&mut planes.y, width, row0, col0, &spatial_out);
        }
    }

    let out_bgr = join_planes(&planes);
    write_bgr(out_path, bgr.width, bgr.height, &out_bgr)?;
    debug!(bytes = message.len(), "DCT embed complete");
    Ok(())
}

pub fn decode(stego_path: &Path) -> Result<Vec<u8>, StegoError> {
    let bgr = read_bgr(stego_path)?;
    let (h8, w8) = block_dims(bgr.width, bgr.height);
    ensure!(h8 >= BLOCK && w8 >= BLOCK, ImageTooSmallForBlockSnafu);

    let planes = split_planes(&bgr);
    let width = planes.width as usize;
    let basis = dct_basis();
    let basis_t = transpose(&basis);

    let mut bits = Vec::with_capacity(capacity_bits_for_dims(bgr.width, bgr.height));
    for block_row in 0..h8 / BLOCK {
        for block_col in 0..w8 / BLOCK {
            let row0 = block_row * BLOCK;
            let col0 = block_col * BLOCK;
            let spatial = read_block(&planes.y, width, row0, col0);
            let coeffs = forward_dct(&spatial, &basis, &basis_t);
            for &(pr, pc) in POSITIONS.iter() {
                bits.push(qim::extract_bit(coeffs[pr][pc], DELTA));
            }
        }
    }

    let mut reader = crate::bitstream::BitReader::new(&bits);
    let msg = frame::parse(&mut reader, DCT_MAGIC)?;
    debug!(bytes = msg.len(), "DCT extract complete");
    Ok(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn write_gradient(path: &Path, size: u32) {
        let img = ImageBuffer::<Rgb<u8>, _>::from_fn(size, size, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        img.save(path).unwrap();
    }

    fn psnr(a: &[f64], b: &[f64]) -> f64 {
        let mse: f64 =
            a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum::<f64>() / a.len() as f64;
        if mse == 0.0 {
            return f64::INFINITY;
        }
        10.0 * (255.0 * 255.0 / mse).log10()
    }

    #[test]
    fn dct_mid_round_trip_and_psnr() {
        let dir = std::env::temp_dir().join("stego_codec_test_dct_mid");
        std::fs::create_dir_all(&dir).unwrap();
        let cover = dir.join("cover.png");
        write_gradient(&cover, 128);
        let out = dir.join("out.png");

        encode(&cover, b"hello", &out).unwrap();
        assert_eq!(decode(&out).unwrap(), b"hello");

        let cover_y = split_planes(&read_bgr(&cover).unwrap()).y;
        let stego_y = split_planes(&read_bgr(&out).unwrap()).y;
        assert!(
            psnr(&cover_y, &stego_y) > 30.0,
            "DCT embed must stay visually unobtrusive"
        );
    }

    #[test]
    fn dct_capacity_bits_formula() {
        // 128x128 -> 16x16 blocks of 8x8, 6 bits each.
        assert_eq!(capacity_bits_for_dims(128, 128), 16 * 16 * 6);
    }

    #[test]
    fn dct_rejects_sub_block_image() {
        let dir = std::env::temp_dir().join("stego_codec_test_dct_small");
        std::fs::create_dir_all(&dir).unwrap();
        let cover = dir.join("cover.png");
        write_gradient(&cover, 4);
        let out = dir.join("out.png");

        let err = encode(&cover, b"x", &out).unwrap_err();
        assert!(matches!(err, StegoError::ImageTooSmallForBlock));
    }

    #[test]
    fn dct_capacity_exceeded() {
        let dir = std::env::temp_dir().join("stego_codec_test_dct_capacity");
        std::fs::create_dir_all(&dir).unwrap();
        let cover = dir.join("cover.png");
        write_gradient(&cover, 128);
        let out = dir.join("out.png");

        let cap = capacity_for_dims(128, 128);
        let too_big = vec![0u8; cap + 1];
        let err = encode(&cover, &too_big, &out).unwrap_err();
        assert!(matches!(err, StegoError::CapacityExceeded { .. }));
    }
}
