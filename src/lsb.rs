//! LSB substitution carrier: rewrites bit 0 of each BGR byte in raster
//! order. Magic `LSB1`.
//!
//! Only the header+payload prefix is touched, leaving the tail bit-identical
//! to the cover rather than rewriting every remaining byte to its own
//! unchanged LSB.

use crate::bitstream::{bytes_to_bits, BitReader};
use crate::error::{CapacityExceededSnafu, StegoError};
use crate::frame::{self, LSB_MAGIC};
use crate::image_io::{read_bgr, write_bgr};
use snafu::ensure;
use std::path::Path;
use tracing::debug;

const CHANNELS: usize = 3;

/// Maximum message bytes a cover of `width`x`height` (BGR, 3 channels) can
/// carry. Saturates at 0 rather than underflowing.
pub fn capacity_for_dims(width: u32, height: u32) -> usize {
    // one bit per raster byte: the carrying capacity in bits equals H*W*C.
    let total_bits = width as usize * height as usize * CHANNELS;
    total_bits.saturating_sub(frame::HEADER_BITS) / 8
}

pub fn capacity(cover_path: &Path) -> Result<usize, StegoError> {
    let img = read_bgr(cover_path)?;
    Ok(capacity_for_dims(img.width, img.height))
}

pub fn encode(cover_path: &Path, message: &[u8], out_path: &Path) -> Result<(), StegoError> {
    let mut img = read_bgr(cover_path)?;
    let cap = capacity_for_dims(img.width, img.height);
    ensure!(
        message.len() <= cap,
        CapacityExceededSnafu {
            needed: message.len(),
            capacity: cap,
        }
    );

    let framed = frame::build(LSB_MAGIC, message);
    let bits = bytes_to_bits(&framed);
    for (byte, bit) in img.data.iter_mut().zip(bits.iter()) {
        *byte = (*byte & !1) | (*bit as u8);
    }

    write_bgr(out_path, img.width, img.height, &img.data)?;
    debug!(bytes = message.len(), "LSB embed complete");
    Ok(())
}

pub fn decode(stego_path: &Path) -> Result<Vec<u8>, StegoError> {
    let img = read_bgr(stego_path)?;
    let bits: Vec<bool> = img.data.iter().map(|b| b & 1 == 1).collect();
    let mut reader = BitReader::new(&bits);
    let msg = frame::parse(&mut reader, LSB_MAGIC)?;
    debug!(bytes = msg.len(), "LSB extract complete");
    Ok(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn write_solid_gray(path: &Path, size: u32, value: u8) {
        let img = ImageBuffer::<Rgb<u8>, _>::from_pixel(size, size, Rgb([value, value, value]));
        img.save(path).unwrap();
    }

    #[test]
    fn lsb_tiny_round_trip() {
        let dir = std::env::temp_dir().join("stego_codec_test_lsb_tiny");
        std::fs::create_dir_all(&dir).unwrap();
        let cover = dir.join("cover.png");
        write_solid_gray(&cover, 32, 128);
        let out = dir.join("out.png");

        encode(&cover, b"hi", &out).unwrap();
        let decoded = decode(&out).unwrap();
        assert_eq!(decoded, b"hi");
    }

    #[test]
    fn lsb_only_touches_prefix_bytes() {
        let dir = std::env::temp_dir().join("stego_codec_test_lsb_prefix");
        std::fs::create_dir_all(&dir).unwrap();
        let cover = dir.join("cover.png");
        write_solid_gray(&cover, 32, 128);
        let out = dir.join("out.png");

        encode(&cover, b"hi", &out).unwrap();
        let cover_img = read_bgr(&cover).unwrap();
        let stego_img = read_bgr(&out).unwrap();
        let touched_bits = frame::total_bits(2);
        for i in touched_bits..cover_img.data.len() {
            assert_eq!(
                cover_img.data[i], stego_img.data[i],
                "byte {i} past the payload must be untouched"
            );
        }
    }

    #[test]
    fn lsb_capacity_edge() {
        // 16x16x3 = 768 one-bit-carrying bytes -> capacity (768 - 64)/8 = 88 bytes.
        assert_eq!(capacity_for_dims(16, 16), 88);

        let dir = std::env::temp_dir().join("stego_codec_test_lsb_capacity");
        std::fs::create_dir_all(&dir).unwrap();
        let cover = dir.join("cover.png");
        write_solid_gray(&cover, 16, 64);
        let out = dir.join("out.png");

        let max_msg = vec![0xABu8; 88];
        encode(&cover, &max_msg, &out).unwrap();
        assert_eq!(decode(&out).unwrap(), max_msg);

        let too_big = vec![0xABu8; 89];
        let err = encode(&cover, &too_big, &out).unwrap_err();
        assert!(matches!(err, StegoError::CapacityExceeded { .. }));
    }

    #[test]
    fn lsb_empty_message_round_trips() {
        let dir = std::env::temp_dir().join("stego_codec_test_lsb_empty");
        std::fs::create_dir_all(&dir).unwrap();
        let cover = dir.join("cover.png");
        write_solid_gray(&cover, 16, 200);
        let out = dir.join("out.png");

        encode(&cover, b"", &out).unwrap();
        assert_eq!(decode(&out).unwrap(), b"");
    }
}
