//! Crate-wide error taxonomy for embed/extract/capacity operations.

use snafu::Snafu;

/// The carrier a `StegoError` or successful detection pertains to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Carrier {
    Lsb,
    Dct,
    Dwt,
}

impl Carrier {
    pub fn name(self) -> &'static str {
        match self {
            Carrier::Lsb => "LSB",
            Carrier::Dct => "DCT",
            Carrier::Dwt => "DWT",
        }
    }
}

impl std::fmt::Display for Carrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StegoError {
    #[snafu(display("failed to decode image at {path:?}"))]
    IoRead {
        path: std::path::PathBuf,
        source: image::ImageError,
    },

    #[snafu(display("failed to write image to {path:?}"))]
    IoWrite {
        path: std::path::PathBuf,
        source: image::ImageError,
    },

    #[snafu(display("failed to create parent directory {path:?}"))]
    CreateParentDir {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[snafu(display(
        "framed payload needs {needed} bytes but carrier capacity is {capacity} bytes"
    ))]
    CapacityExceeded { needed: usize, capacity: usize },

    #[snafu(display("image is too small to hold even the 8-byte frame header"))]
    ImageTooSmallForHeader,

    #[snafu(display("image must be at least 8x8 after cropping to block boundaries"))]
    ImageTooSmallForBlock,

    #[snafu(display("header magic mismatch: expected {expected:?}, found {found:?}"))]
    BadHeader {
        expected: [u8; 4],
        found: [u8; 4],
    },

    #[snafu(display("bit source exhausted before {needed} payload bits could be read"))]
    TruncatedPayload { needed: usize },

    #[snafu(display("DWT carrier unavailable: Haar backend disabled in this build"))]
    FeatureUnavailable,

    #[snafu(display("unknown carrier name {name:?} (expected lsb, dct, or dwt)"))]
    UnknownCarrier { name: String },

    #[snafu(display("all carriers failed: {}", describe_attempts(attempts)))]
    AllCarriersFailed {
        attempts: Vec<(Carrier, Box<StegoError>)>,
    },
}

fn describe_attempts(attempts: &[(Carrier, Box<StegoError>)]) -> String {
    attempts
        .iter()
        .map(|(carrier, err)| format!("{carrier}: {err}"))
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T, E = StegoError> = std::result::Result<T, E>;
