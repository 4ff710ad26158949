//! Shared test utilities for the e2e-preview test suite.
//!
//! Provides tiny encoded rasters, synthetic record trees, and TFRecord
//! framing so tests can exercise extraction without real shards.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let record = camera_record("CAMERA_FRONT", encode_jpeg(8, 8, [255, 0, 0]));
//! let shard = tfrecord_bytes(&[json_payload(&record)]);
//! ```

use crate::node::Message;
use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

// =========================================================================
// Encoded rasters
// =========================================================================

fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    buf
}

/// A solid-color JPEG.
pub fn encode_jpeg(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb(rgb));
    encode(DynamicImage::ImageRgb8(img), ImageFormat::Jpeg)
}

/// A solid-color RGB PNG (lossless, so pixel values survive exactly).
pub fn encode_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb(rgb));
    encode(DynamicImage::ImageRgb8(img), ImageFormat::Png)
}

/// A solid single-channel PNG.
pub fn gray_png(width: u32, height: u32, value: u8) -> Vec<u8> {
    let img = GrayImage::from_pixel(width, height, Luma([value]));
    encode(DynamicImage::ImageLuma8(img), ImageFormat::Png)
}

/// A solid RGBA PNG.
pub fn rgba_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(rgba));
    encode(DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

// =========================================================================
// Record trees
// =========================================================================

/// One camera entry: a `camera` label followed by its encoded image.
pub fn camera_entry(label: &str, blob: Vec<u8>) -> Message {
    Message::new()
        .with_string("camera", label)
        .with_bytes("image", blob)
}

/// A record with a single repeated `images` field holding one camera entry.
pub fn camera_record(label: &str, blob: Vec<u8>) -> Message {
    Message::new().with_messages("images", vec![camera_entry(label, blob)])
}

// =========================================================================
// TFRecord framing
// =========================================================================

/// Serialize a tree the way `JsonTreeDecoder` expects it.
pub fn json_payload(record: &Message) -> Vec<u8> {
    serde_json::to_vec(record).unwrap()
}

/// Frame payloads as a TFRecord stream. CRC words are zero.
pub fn tfrecord_bytes(payloads: &[Vec<u8>]) -> Vec<u8> {
    let mut out = Vec::new();
    for payload in payloads {
        out.extend_from_slice(&(payload.len() as u64).to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(payload);
        out.extend_from_slice(&0u32.to_le_bytes());
    }
    out
}
