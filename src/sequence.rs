//! Record scanning and frame sequencing.
//!
//! Turns a stream of raw records into an ordered list of display frames:
//!
//! ```text
//! raw bytes ─ RecordDecoder ─▶ tree ─┬─ collect images ──▶ by source
//!                                    └─ resolve metadata ─▶ (identifier, ts)
//!                                           │
//!            sort by (identifier, ts) ◀─────┘
//!                      │
//!            mosaic (or the sole image) ─▶ Frame
//! ```
//!
//! ## Limits
//!
//! At most `max_records` records are read, whether or not they contain
//! images, and at most `max_frames` frames are built from what was found.
//!
//! ## Failure policy
//!
//! Source and record decoding errors abort the scan. Records without images
//! and blobs that fail to decode are skipped silently. A scan in which no
//! record produced an image fails with [`SequenceError::EmptyResult`].

use crate::collect::{collect_images, images_by_source};
use crate::config::PreviewConfig;
use crate::imaging::{ImageDecoder, assemble, sort_labels};
use crate::metadata::{resolve_identifier, resolve_timestamp_us};
use crate::node::Node;
use crate::source::{DecodeError, RecordDecoder, SourceError};
use crate::types::{Frame, RecordSummary};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SequenceError {
    #[error("Record source error: {0}")]
    Source(#[from] SourceError),
    #[error("Record {index}: {source}")]
    Decode { index: usize, source: DecodeError },
    #[error("No JPEG/PNG image bytes found in {scanned} records")]
    EmptyResult { scanned: usize },
}

/// Limits and layout for a sequencing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceConfig {
    pub max_records: usize,
    pub max_frames: usize,
    /// Mosaic grid as (rows, cols).
    pub tile: (u32, u32),
    pub pad: u32,
}

impl SequenceConfig {
    /// Build a SequenceConfig from PreviewConfig values.
    pub fn from_preview_config(config: &PreviewConfig) -> Self {
        let [rows, cols] = config.mosaic.tile;
        Self {
            max_records: config.max_records,
            max_frames: config.max_frames,
            tile: (rows, cols),
            pad: config.mosaic.pad,
        }
    }
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self::from_preview_config(&PreviewConfig::default())
    }
}

/// Summaries gathered by a scan, with counts for reporting.
#[derive(Debug)]
pub struct Scan {
    pub summaries: Vec<RecordSummary>,
    pub records_scanned: usize,
}

/// The result of a full sequencing run.
#[derive(Debug)]
pub struct Timeline {
    pub frames: Vec<Frame>,
    pub records_scanned: usize,
    pub records_with_images: usize,
}

/// Extract images and metadata from one record tree. `None` when the tree
/// holds no decodable image.
pub fn summarize(node: &dyn Node, decoder: &impl ImageDecoder) -> Option<RecordSummary> {
    let images = collect_images(node, decoder);
    if images.is_empty() {
        return None;
    }
    Some(RecordSummary {
        identifier: resolve_identifier(node),
        timestamp_us: resolve_timestamp_us(node),
        images_by_source: images_by_source(images),
    })
}

/// Decode and summarize up to `max_records` records.
pub fn collect_summaries<I, R, D>(
    records: I,
    record_decoder: &R,
    image_decoder: &D,
    max_records: usize,
) -> Result<Scan, SequenceError>
where
    I: IntoIterator<Item = Result<Vec<u8>, SourceError>>,
    R: RecordDecoder,
    D: ImageDecoder,
{
    let mut summaries = Vec::new();
    let mut scanned = 0;

    for raw in records.into_iter().take(max_records) {
        let raw = raw?;
        let index = scanned;
        scanned += 1;

        let tree = record_decoder
            .decode(&raw)
            .map_err(|source| SequenceError::Decode { index, source })?;
        match summarize(&tree, image_decoder) {
            Some(summary) => {
                log::debug!(
                    "record {index}: {} ({} sources)",
                    summary.identifier,
                    summary.images_by_source.len()
                );
                summaries.push(summary);
            }
            None => log::debug!("record {index}: no images"),
        }
    }

    log::info!(
        "scanned {scanned} records, {} with images",
        summaries.len()
    );
    Ok(Scan {
        summaries,
        records_scanned: scanned,
    })
}

/// Order summaries by (identifier, timestamp) and compose up to
/// `max_frames` frames.
pub fn build_frames(mut summaries: Vec<RecordSummary>, config: &SequenceConfig) -> Vec<Frame> {
    summaries.sort_by(|a, b| {
        a.identifier
            .cmp(&b.identifier)
            .then(a.timestamp_us.cmp(&b.timestamp_us))
    });

    let mut frames = Vec::new();
    for summary in summaries {
        if frames.len() >= config.max_frames {
            break;
        }
        let sources: Vec<String> = sort_labels(summary.images_by_source.keys().map(String::as_str))
            .into_iter()
            .map(String::from)
            .collect();

        let image = if summary.images_by_source.len() == 1 {
            summary.images_by_source.into_values().next()
        } else {
            assemble(&summary.images_by_source, config.tile, config.pad)
        };
        let Some(image) = image else {
            continue;
        };

        frames.push(Frame {
            image,
            identifier: summary.identifier,
            timestamp_us: summary.timestamp_us,
            sources,
        });
    }
    frames
}

/// Scan `records` and build the frame timeline.
pub fn sequence<I, R, D>(
    records: I,
    record_decoder: &R,
    image_decoder: &D,
    config: &SequenceConfig,
) -> Result<Timeline, SequenceError>
where
    I: IntoIterator<Item = Result<Vec<u8>, SourceError>>,
    R: RecordDecoder,
    D: ImageDecoder,
{
    let scan = collect_summaries(records, record_decoder, image_decoder, config.max_records)?;
    if scan.summaries.is_empty() {
        return Err(SequenceError::EmptyResult {
            scanned: scan.records_scanned,
        });
    }

    let records_with_images = scan.summaries.len();
    let frames = build_frames(scan.summaries, config);
    log::info!(
        "buffered {} frames (from {} records scanned)",
        frames.len(),
        scan.records_scanned
    );
    Ok(Timeline {
        frames,
        records_scanned: scan.records_scanned,
        records_with_images,
    })
}
