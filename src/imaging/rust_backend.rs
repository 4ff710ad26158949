//! Pure Rust decoding backend.
//!
//! | Format | Crate / function |
//! |---|---|
//! | JPEG | `image::load_from_memory_with_format` (`jpeg` feature) |
//! | PNG | `image::load_from_memory_with_format` (`png` feature) |
//! | Channel normalization | `DynamicImage::to_rgb8` |

use super::backend::{DecodeImageError, ImageDecoder};
use crate::sniff::RasterFormat;
use image::{ImageFormat, RgbImage};

/// Decoder backed by the `image` crate.
pub struct RustDecoder;

impl RustDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustDecoder {
    fn default() -> Self {
        Self::new()
    }
}

fn image_format(format: RasterFormat) -> ImageFormat {
    match format {
        RasterFormat::Jpeg => ImageFormat::Jpeg,
        RasterFormat::Png => ImageFormat::Png,
    }
}

impl ImageDecoder for RustDecoder {
    fn decode(&self, blob: &[u8], format: RasterFormat) -> Result<RgbImage, DecodeImageError> {
        let decoded = image::load_from_memory_with_format(blob, image_format(format)).map_err(
            |e| DecodeImageError::Malformed {
                format,
                reason: e.to_string(),
            },
        )?;
        // Gray → RGB replicates the channel, RGBA → RGB drops alpha.
        let rgb = decoded.to_rgb8();
        if rgb.width() == 0 || rgb.height() == 0 {
            return Err(DecodeImageError::Empty);
        }
        Ok(rgb)
    }
}
