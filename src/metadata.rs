//! Record metadata resolution by field-name heuristics.
//!
//! Records do not share a schema, so identifiers and timestamps are found by
//! what their fields are *called*. Names are compared lowercased; the first
//! match in walk order wins (a node's own fields before its children,
//! children in field order).
//!
//! ## Identifier
//!
//! The first source that produces a value wins:
//!
//! 1. A non-empty string (or UTF-8 bytes) field named `segment` or containing
//!    `segment_id`.
//! 2. `{run}_seg{index:04}`, where `run` comes from a field named `run` or
//!    containing `run_id` (default `run_unknown`) and `index` from an integer
//!    field containing `segment_index` or `segment_num`.
//! 3. `{run}_seg_{hash8}`: the first 8 hex digits of the SHA-1 of `run`
//!    followed by the first string field containing `sequence` (or nothing).
//!
//! ## Timestamp
//!
//! An integer field containing `timestamp_us` or named `time_us` is taken as
//! microseconds verbatim. Otherwise the first integer field containing
//! `timestamp` is normalized by magnitude (see [`normalize_timestamp`]).
//! No timestamp at all resolves to 0.

use crate::node::{FieldKind, Node, Scalar};
use crate::walk::{Action, HintContext, Leaf, walk};
use sha1::{Digest, Sha1};

/// Values above this are taken to be nanoseconds.
pub const NANOS_THRESHOLD: i64 = 1_000_000_000_000_000;
/// Values above this (and not above [`NANOS_THRESHOLD`]) are taken to be
/// milliseconds.
pub const MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

const UNKNOWN_RUN: &str = "run_unknown";

/// Decode bytes as UTF-8, dropping invalid sequences.
fn utf8_ignoring_errors(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// First non-empty string or UTF-8 bytes value whose lowercased field name
/// satisfies `pred`.
pub fn first_string(node: &dyn Node, pred: impl Fn(&str) -> bool) -> Option<String> {
    let mut visitor = |leaf: &Leaf<'_>, _: &HintContext| {
        if !pred(&leaf.name.to_lowercase()) {
            return Action::Ignore;
        }
        let text = match (leaf.kind, leaf.value) {
            (FieldKind::String, Scalar::Str(s)) => s.to_string(),
            (FieldKind::Bytes, Scalar::Bytes(b)) => utf8_ignoring_errors(b),
            _ => return Action::Ignore,
        };
        if text.is_empty() {
            Action::Ignore
        } else {
            Action::Record(text)
        }
    };
    walk(node, &mut visitor).into_iter().next()
}

/// First integer-kind value whose lowercased field name satisfies `pred`.
pub fn first_int(node: &dyn Node, pred: impl Fn(&str) -> bool) -> Option<i64> {
    let mut visitor = |leaf: &Leaf<'_>, _: &HintContext| {
        if !leaf.kind.is_integer() || !pred(&leaf.name.to_lowercase()) {
            return Action::Ignore;
        }
        match leaf.value.as_i64() {
            Some(v) => Action::Record(v),
            None => Action::Ignore,
        }
    };
    walk(node, &mut visitor).into_iter().next()
}

/// Best-effort segment identifier for a record.
pub fn resolve_identifier(node: &dyn Node) -> String {
    if let Some(id) = first_string(node, |n| n.contains("segment_id") || n == "segment") {
        return id;
    }

    let run = first_string(node, |n| n.contains("run_id") || n == "run")
        .unwrap_or_else(|| UNKNOWN_RUN.to_string());

    if let Some(index) = first_int(node, |n| {
        n.contains("segment_index") || n.contains("segment_num")
    }) {
        return format!("{run}_seg{index:04}");
    }

    let sequence = first_string(node, |n| n.contains("sequence")).unwrap_or_default();
    let digest = Sha1::digest(format!("{run}{sequence}").as_bytes());
    let hex = format!("{:x}", digest);
    format!("{run}_seg_{}", &hex[..8])
}

/// Normalize a timestamp of unknown unit to microseconds.
///
/// The nanosecond check runs first: anything above 10^15 is divided by 1000,
/// anything else above 10^12 is multiplied by 1000. A millisecond value just
/// above 10^15 is therefore read as nanoseconds; without unit metadata there
/// is nothing better to go on.
pub fn normalize_timestamp(t: i64) -> i64 {
    if t > NANOS_THRESHOLD {
        t / 1000
    } else if t > MILLIS_THRESHOLD {
        t.saturating_mul(1000)
    } else {
        t
    }
}

/// Best-effort timestamp of a record in microseconds. Negative values clamp
/// to 0.
pub fn resolve_timestamp_us(node: &dyn Node) -> u64 {
    let us = match first_int(node, |n| n.contains("timestamp_us") || n == "time_us") {
        Some(ts) => ts,
        None => first_int(node, |n| n.contains("timestamp"))
            .map(normalize_timestamp)
            .unwrap_or(0),
    };
    u64::try_from(us).unwrap_or(0)
}

const MAX_SLUG_LEN: usize = 80;

/// Make an identifier safe for file names.
///
/// ASCII alphanumerics, `-` and `_` are kept; every other run of characters
/// becomes one `-`. Leading and trailing dashes are stripped and the result
/// is cut to `MAX_SLUG_LEN` bytes.
pub fn sanitize_slug(identifier: &str) -> String {
    let mut slug = String::with_capacity(identifier.len());
    for c in identifier.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let trimmed = slug.trim_matches('-');
    let cut = &trimmed[..trimmed.len().min(MAX_SLUG_LEN)];
    cut.trim_end_matches('-').to_string()
}
