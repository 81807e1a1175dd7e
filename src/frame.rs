//! Framed payload: `magic(4) || length_be32(4) || bytes(length)`.
//!
//! One magic per carrier (`LSB1`, `DCT1`, `DWT1`) so `decode_any` can tell
//! carriers apart instead of relying on a single shared magic.

use crate::bitstream::{bits_to_bytes, bytes_to_bits, BitReader};
use crate::error::{BadHeaderSnafu, StegoError};
use snafu::ensure;

pub const HEADER_BYTES: usize = 8;
pub const HEADER_BITS: usize = HEADER_BYTES * 8;

pub const LSB_MAGIC: [u8; 4] = *b"LSB1";
pub const DCT_MAGIC: [u8; 4] = *b"DCT1";
pub const DWT_MAGIC: [u8; 4] = *b"DWT1";

/// Builds the wire bytes for a framed payload: `magic || len_be32 || msg`.
pub fn build(magic: [u8; 4], msg: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_BYTES + msg.len());
    out.extend_from_slice(&magic);
    out.extend_from_slice(&(msg.len() as u32).to_be_bytes());
    out.extend_from_slice(msg);
    out
}

/// Number of payload bits (excluding the header) implied by a message of
/// `msg_len` bytes.
pub fn total_bits(msg_len: usize) -> usize {
    HEADER_BITS + msg_len * 8
}

/// Parses a framed payload out of a bit source, validating `expected_magic`.
///
/// Fails with [`StegoError::ImageTooSmallForHeader`] if the source runs out
/// before the header, [`StegoError::BadHeader`] if the magic doesn't match,
/// or [`StegoError::TruncatedPayload`] if the source runs out before
/// `length` bytes have been read.
pub fn parse(reader: &mut BitReader<'_>, expected_magic: [u8; 4]) -> Result<Vec<u8>, StegoError> {
    let header_bits = reader
        .take(HEADER_BITS)
        .ok_or(StegoError::ImageTooSmallForHeader)?;
    let header_bytes = bits_to_bytes(header_bits);

    let mut found = [0u8; 4];
    found.copy_from_slice(&header_bytes[0..4]);
    ensure!(
        found == expected_magic,
        BadHeaderSnafu {
            expected: expected_magic,
            found,
        }
    );

    let length = u32::from_be_bytes([header_bytes[4], header_bytes[5], header_bytes[6], header_bytes[7]]) as usize;
    let payload_bits = length * 8;
    let body = reader
        .take(payload_bits)
        .ok_or(StegoError::TruncatedPayload {
            needed: payload_bits,
        })?;
    Ok(bits_to_bytes(body))
}

/// Convenience: build a framed payload and immediately expand it to bits,
/// for carriers (DCT/DWT) that embed bit-by-bit rather than byte-by-byte.
pub fn build_bits(magic: [u8; 4], msg: &[u8]) -> Vec<bool> {
    bytes_to_bits(&build(magic, msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_expected_wire_bytes() {
        let framed = build(LSB_MAGIC, b"hi");
        assert_eq!(&framed[0..4], b"LSB1");
        assert_eq!(&framed[4..8], &2u32.to_be_bytes());
        assert_eq!(&framed[8..], b"hi");
    }

    #[test]
    fn round_trips_through_bits() {
        let bits = build_bits(DCT_MAGIC, b"hello");
        let mut reader = BitReader::new(&bits);
        let msg = parse(&mut reader, DCT_MAGIC).unwrap();
        assert_eq!(msg, b"hello");
    }

    #[test]
    fn round_trips_empty_message() {
        let bits = build_bits(DWT_MAGIC, b"");
        let mut reader = BitReader::new(&bits);
        let msg = parse(&mut reader, DWT_MAGIC).unwrap();
        assert!(msg.is_empty());
    }

    #[test]
    fn rejects_wrong_magic() {
        let bits = build_bits(LSB_MAGIC, b"hi");
        let mut reader = BitReader::new(&bits);
        let err = parse(&mut reader, DCT_MAGIC).unwrap_err();
        assert!(matches!(err, StegoError::BadHeader { .. }));
    }

    #[test]
    fn rejects_image_too_small_for_header() {
        let bits = vec![false; HEADER_BITS - 1];
        let mut reader = BitReader::new(&bits);
        let err = parse(&mut reader, LSB_MAGIC).unwrap_err();
        assert!(matches!(err, StegoError::ImageTooSmallForHeader));
    }

    #[test]
    fn rejects_truncated_body() {
        let mut bits = build_bits(LSB_MAGIC, b"hello");
        bits.truncate(bits.len() - 1);
        let mut reader = BitReader::new(&bits);
        let err = parse(&mut reader, LSB_MAGIC).unwrap_err();
        assert!(matches!(err, StegoError::TruncatedPayload { .. }));
    }
}
