//! # e2e-preview
//!
//! Camera previews for shards of tree-shaped driving records, without a
//! schema binding. Records are walked as self-describing trees: image blobs
//! are found by their magic bytes, camera labels by field names, and segment
//! identifiers and timestamps by naming heuristics. Each record's cameras are
//! tiled into one mosaic frame and the frames are ordered into a timeline.
//!
//! # Pipeline
//!
//! ```text
//! 1. Source     shard file   →  raw record payloads        (TFRecord framing)
//! 2. Decode     payload      →  Node tree                  (RecordDecoder)
//! 3. Extract    Node tree    →  images + id + timestamp    (walk, collect, metadata)
//! 4. Sequence   summaries    →  sorted, capped frames      (mosaic per record)
//! 5. Browse     frames       →  cursor with next/previous
//! ```
//!
//! Stage 3 is schema-agnostic: it only sees the [`node::Node`] capability,
//! so any binding that can list its fields can be previewed.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`node`] | `Node` capability, field descriptors, owned `Message` tree |
//! | [`sniff`] | JPEG/PNG detection by magic prefix |
//! | [`walk`] | Generic recursive walker with scoped hint context |
//! | [`collect`] | Image collector: decoded images tagged with camera labels |
//! | [`metadata`] | Identifier and timestamp resolution by field-name heuristics |
//! | [`imaging`] | Decoder trait + `image` backend, mosaic assembly |
//! | [`source`] | Shard discovery, TFRecord reader, record decoders |
//! | [`sequence`] | Scan records, sort summaries, build frames |
//! | [`browser`] | Cursor over the frame timeline |
//! | [`config`] | `e2e-preview.toml` loading, merging, validation |
//! | [`output`] | CLI output formatting |
//! | [`types`] | Shared types (`DiscoveredImage`, `RecordSummary`, `Frame`) |
//!
//! # Design Decisions
//!
//! ## Hints Are Copied at Message Boundaries
//!
//! A camera label and its image are usually siblings in the same message.
//! The label therefore applies to later fields of the same message, while
//! every nested message starts from a copy of its parent's context. Labels
//! never leak sideways between elements of a repeated message.
//!
//! ## Descriptor Kind Decides, Not the Value
//!
//! The walker dispatches on each field's declared kind and cardinality. A
//! value that does not fit its descriptor is ignored rather than coerced.
//!
//! ## Best Effort, Never Fatal Per Record
//!
//! A blob that looks like an image but does not decode, or a record without
//! images, is skipped. Only a missing shard, a corrupt stream, an undecodable
//! record, or a scan without a single image stops the run.

pub mod browser;
pub mod collect;
pub mod config;
pub mod imaging;
pub mod metadata;
pub mod node;
pub mod output;
pub mod sequence;
pub mod sniff;
pub mod source;
pub mod types;
pub mod walk;

#[cfg(test)]
pub(crate) mod test_helpers;
