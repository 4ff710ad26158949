//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure and do no I/O.
//!
//! ## Scan
//!
//! ```text
//! Shard: data/training_0001.tfrecord
//! 001 runA_seg0003  ts=1550083467346370
//!     Sources: CAMERA_FRONT, CAMERA_FRONT_LEFT, CAMERA_REAR
//! 002 runA_seg0003  ts=1550083467446370
//!     Sources: CAM
//!
//! Buffered 2 frames (from 14 records scanned, 2 with images)
//! ```

use crate::metadata::sanitize_slug;
use crate::sequence::Timeline;
use crate::types::Frame;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// One header line per frame plus its sources.
fn frame_lines(position: usize, frame: &Frame) -> Vec<String> {
    vec![
        format!(
            "{} {}  ts={}",
            format_index(position),
            frame.identifier,
            frame.timestamp_us
        ),
        format!("    Sources: {}", frame.sources.join(", ")),
    ]
}

/// Summary line closing every command's output.
pub fn format_summary(timeline: &Timeline) -> String {
    format!(
        "Buffered {} frames (from {} records scanned, {} with images)",
        timeline.frames.len(),
        timeline.records_scanned,
        timeline.records_with_images
    )
}

/// Format the frame timeline of a scan.
pub fn format_scan_output(timeline: &Timeline, shard: &Path) -> Vec<String> {
    let mut lines = vec![format!("Shard: {}", shard.display())];
    for (i, frame) in timeline.frames.iter().enumerate() {
        lines.extend(frame_lines(i + 1, frame));
    }
    lines.push(String::new());
    lines.push(format_summary(timeline));
    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(timeline: &Timeline, shard: &Path) {
    for line in format_scan_output(timeline, shard) {
        println!("{}", line);
    }
}

/// File name for an exported frame: `NNNN-{identifier}-{ts}.png`.
pub fn export_file_name(position: usize, frame: &Frame) -> String {
    let slug = sanitize_slug(&frame.identifier);
    let slug = if slug.is_empty() { "frame".to_string() } else { slug };
    format!("{:04}-{}-{}.png", position, slug, frame.timestamp_us)
}

/// Line reported for one exported frame.
pub fn format_export_line(position: usize, frame: &Frame, file_name: &str) -> String {
    format!(
        "{} {}  ts={} \u{2192} {}",
        format_index(position),
        frame.identifier,
        frame.timestamp_us,
        file_name
    )
}
