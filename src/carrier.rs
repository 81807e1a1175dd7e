//! Tagged carrier dispatch and the auto-detect driver.
//!
//! A small closed trait implemented by three unit structs replaces dynamic
//! dispatch over carrier name strings, and auto-detect's try-each-in-order
//! logic is a fold that returns the first success or an aggregate error.

use crate::error::{Carrier as CarrierTag, StegoError};
use crate::{dct, dwt, lsb};
use std::path::Path;
use tracing::debug;

/// Common interface shared by the three embedding domains.
pub trait CarrierCodec {
    fn magic(&self) -> &'static str;
    fn tag(&self) -> CarrierTag;
    fn encode(&self, cover_path: &Path, message: &[u8], out_path: &Path) -> Result<(), StegoError>;
    fn decode(&self, stego_path: &Path) -> Result<Vec<u8>, StegoError>;
    fn capacity(&self, cover_path: &Path) -> Result<usize, StegoError>;
}

pub struct Lsb;
pub struct Dct;
pub struct Dwt;

impl CarrierCodec for Lsb {
    fn magic(&self) -> &'static str {
        "LSB1"
    }
    fn tag(&self) -> CarrierTag {
        CarrierTag::Lsb
    }
    fn encode(&self, cover_path: &Path, message: &[u8], out_path: &Path) -> Result<(), StegoError> {
        lsb::encode(cover_path, message, out_path)
    }
    fn decode(&self, stego_path: &Path) -> Result<Vec<u8>, StegoError> {
        lsb::decode(stego_path)
    }
    fn capacity(&self, cover_path: &Path) -> Result<usize, StegoError> {
        lsb::capacity(cover_path)
    }
}

impl CarrierCodec for Dct {
    fn magic(&self) -> &'static str {
        "DCT1"
    }
    fn tag(&self) -> CarrierTag {
        CarrierTag::Dct
    }
    fn encode(&self, cover_path: &Path, message: &[u8], out_path: &Path) -> Result<(), StegoError> {
        dct::encode(cover_path, message, out_path)
    }
    fn decode(&self, stego_path: &Path) -> Result<Vec<u8>, StegoError> {
        dct::decode(stego_path)
    }
    fn capacity(&self, cover_path: &Path) -> Result<usize, StegoError> {
        dct::capacity(cover_path)
    }
}

impl CarrierCodec for Dwt {
    fn magic(&self) -> &'static str {
        "DWT1"
    }
    fn tag(&self) -> CarrierTag {
        CarrierTag::Dwt
    }
    fn encode(&self, cover_path: &Path, message: &[u8], out_path: &Path) -> Result<(), StegoError> {
        dwt::encode(cover_path, message, out_path)
    }
    fn decode(&self, stego_path: &Path) -> Result<Vec<u8>, StegoError> {
        dwt::decode(stego_path)
    }
    fn capacity(&self, cover_path: &Path) -> Result<usize, StegoError> {
        dwt::capacity(cover_path)
    }
}

/// Carriers in the order auto-detect tries them: LSB first (cheapest, most
/// common), DWT last (most expensive decode). Order is part of the contract,
/// not an implementation detail.
pub fn all() -> [Box<dyn CarrierCodec>; 3] {
    [Box::new(Lsb), Box::new(Dct), Box::new(Dwt)]
}

/// Tries each carrier's extractor in the fixed order, returning the first
/// carrier+message that parses successfully. Collects every carrier's error
/// into [`StegoError::AllCarriersFailed`] only if all three fail.
pub fn decode_any(stego_path: &Path) -> Result<(CarrierTag, Vec<u8>), StegoError> {
    let mut attempts = Vec::with_capacity(3);
    for carrier in all() {
        debug!(carrier = carrier.magic(), "auto-detect trying carrier");
        match carrier.decode(stego_path) {
            Ok(message) => return Ok((carrier.tag(), message)),
            Err(err) => attempts.push((carrier.tag(), Box::new(err))),
        }
    }
    Err(StegoError::AllCarriersFailed { attempts })
}

/// Parses a carrier name (`lsb`, `dct`, `dwt`, case-insensitive) into a
/// [`CarrierCodec`], for CLI/driver callers that take a carrier by name.
pub fn by_name(name: &str) -> Result<Box<dyn CarrierCodec>, StegoError> {
    match name.to_ascii_lowercase().as_str() {
        "lsb" => Ok(Box::new(Lsb)),
        "dct" => Ok(Box::new(Dct)),
        "dwt" => Ok(Box::new(Dwt)),
        other => Err(StegoError::UnknownCarrier {
            name: other.to_string(),
        }),
    }
}
