//! Shared types passed between extraction, sequencing, and browsing.

use image::RgbImage;
use std::collections::BTreeMap;

/// Label used when no camera hint was in scope for an image.
pub const SENTINEL_SOURCE: &str = "CAM";

/// An image found in a record tree, tagged with its best-effort source.
#[derive(Debug, Clone)]
pub struct DiscoveredImage {
    pub source: String,
    pub pixels: RgbImage,
}

/// Everything extracted from one record that produced at least one image.
#[derive(Debug, Clone)]
pub struct RecordSummary {
    pub identifier: String,
    pub timestamp_us: u64,
    /// First image seen per source label.
    pub images_by_source: BTreeMap<String, RgbImage>,
}

/// A display-ready frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub image: RgbImage,
    pub identifier: String,
    pub timestamp_us: u64,
    /// Source labels in tile order.
    pub sources: Vec<String>,
}
