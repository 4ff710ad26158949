//! Image decoding trait and shared types.
//!
//! The [`ImageDecoder`] trait is the seam between extraction and pixel work:
//! the collector only knows that a blob looked like an image, the decoder
//! turns it into a normalized RGB8 raster or refuses.
//!
//! The production implementation is
//! [`RustDecoder`](super::rust_backend::RustDecoder), built on the `image`
//! crate.

use crate::sniff::RasterFormat;
use image::RgbImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeImageError {
    #[error("malformed {format:?} data: {reason}")]
    Malformed { format: RasterFormat, reason: String },
    #[error("decoded image has no pixels")]
    Empty,
}

/// Pixel size of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl From<&RgbImage> for Dimensions {
    fn from(img: &RgbImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
        }
    }
}

/// Decodes sniffed image blobs into 3-channel 8-bit rasters.
///
/// Grayscale is replicated to three channels and alpha is dropped, so every
/// image coming out of a decoder can be tiled with every other.
pub trait ImageDecoder {
    fn decode(&self, blob: &[u8], format: RasterFormat) -> Result<RgbImage, DecodeImageError>;
}
