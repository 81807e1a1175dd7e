//! Decodes a file path into the pixel layouts the codecs need (BGR raster
//! for LSB/DCT, single-channel luma for DWT) and encodes a buffer back to a
//! lossless container.
//!
//! Orientation-aware decode (via `ImageDecoder::orientation` +
//! `apply_orientation`) keeps EXIF-rotated covers from silently flipping
//! embedded bits relative to what a viewer shows. Parent-directory creation
//! and extension inference in `prepare_output_path` exist because `encode`
//! is a bare library entry point rather than a path a GUI save dialog has
//! already validated.

use crate::error::{CreateParentDirSnafu, IoReadSnafu, IoWriteSnafu, StegoError};
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader};
use snafu::ResultExt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A decoded BGR image, flattened to `(H, W, 3)` row-major, channel-innermost
/// bytes, the layout the LSB and DCT carriers walk directly.
pub struct BgrImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// A decoded single-channel luma image, row-major.
pub struct LumaImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

fn load_with_orientation(path: &Path) -> Result<DynamicImage, StegoError> {
    debug!(?path, "decoding image");
    let reader = ImageReader::open(path).context(IoReadSnafu { path })?;
    let mut decoder = reader
        .into_decoder()
        .map_err(|source| StegoError::IoRead {
            path: path.to_path_buf(),
            source,
        })?;
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    let mut img =
        DynamicImage::from_decoder(decoder).context(IoReadSnafu { path })?;
    img.apply_orientation(orientation);
    Ok(img)
}

pub fn read_bgr(path: &Path) -> Result<BgrImage, StegoError> {
    let img = load_with_orientation(path)?;
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    let mut data = rgb.into_raw();
    // image decodes as RGB; the wire contract fixes channel order as BGR.
    for px in data.chunks_exact_mut(3) {
        px.swap(0, 2);
    }
    Ok(BgrImage { width, height, data })
}

pub fn read_luma(path: &Path) -> Result<LumaImage, StegoError> {
    let img = load_with_orientation(path)?;
    let luma = img.to_luma8();
    let (width, height) = luma.dimensions();
    Ok(LumaImage {
        width,
        height,
        data: luma.into_raw(),
    })
}

/// Appends `.png` when `path` has no extension, and ensures the parent
/// directory exists.
fn prepare_output_path(path: &Path) -> Result<PathBuf, StegoError> {
    let path = if path.extension().is_none() {
        path.with_extension("png")
    } else {
        path.to_path_buf()
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).context(CreateParentDirSnafu { path: parent })?;
        }
    }
    warn_on_lossy_container(&path);
    Ok(path)
}

fn warn_on_lossy_container(path: &Path) {
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        let ext = ext.to_ascii_lowercase();
        if ext == "jpg" || ext == "jpeg" {
            warn!(
                ?path,
                "writing stego output to a lossy JPEG container; embedding is not guaranteed to survive re-encoding"
            );
        }
    }
}

/// Writes a BGR byte buffer (as produced by [`read_bgr`]) back to `path`.
pub fn write_bgr(path: &Path, width: u32, height: u32, bgr: &[u8]) -> Result<(), StegoError> {
    let path = prepare_output_path(path)?;
    let mut rgb = bgr.to_vec();
    for px in rgb.chunks_exact_mut(3) {
        px.swap(0, 2);
    }
    let buffer = image::RgbImage::from_raw(width, height, rgb).expect("buffer sized for width*height*3");
    buffer
        .save(&path)
        .context(IoWriteSnafu { path: path.clone() })?;
    debug!(?path, width, height, "wrote stego image");
    Ok(())
}

/// Writes a single-channel luma buffer (as produced by [`read_luma`]) back
/// to `path`.
pub fn write_luma(path: &Path, width: u32, height: u32, luma: &[u8]) -> Result<(), StegoError> {
    let path = prepare_output_path(path)?;
    let buffer = image::GrayImage::from_raw(width, height, luma.to_vec())
        .expect("buffer sized for width*height");
    buffer
        .save(&path)
        .context(IoWriteSnafu { path: path.clone() })?;
    debug!(?path, width, height, "wrote stego image");
    Ok(())
}
