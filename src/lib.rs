//! Embeds and recovers short byte payloads inside raster images using three
//! carriers: LSB substitution, block-DCT QIM, and single-level Haar
//! DWT-QIM, plus an auto-detect driver that tries each extractor in turn.
//!
//! Each carrier is a pure function of its inputs: `encode` reads a cover
//! image, writes a self-describing framed payload into it, and saves a
//! lossless stego image; `decode` reads a stego image and recovers the
//! payload or fails with a [`StegoError`]. No carrier retains state between
//! calls, and none of them perform cryptographic confidentiality: the
//! payload is hidden, not encrypted.
//!
//! ```no_run
//! use std::path::Path;
//!
//! stego_codec::lsb::encode(Path::new("cover.png"), b"hello", Path::new("stego.png")).unwrap();
//! let msg = stego_codec::lsb::decode(Path::new("stego.png")).unwrap();
//! assert_eq!(msg, b"hello");
//! ```

pub mod bitstream;
pub mod carrier;
pub mod dct;
pub mod dwt;
pub mod error;
pub mod frame;
pub mod image_io;
pub mod lsb;
pub mod qim;

pub use carrier::{by_name, decode_any, CarrierCodec};
pub use error::{Carrier, StegoError};
