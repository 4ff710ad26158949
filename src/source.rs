//! Record sources: shard discovery, TFRecord framing, record decoding.
//!
//! ## Shard discovery
//!
//! The configured base is either a shard file or a directory tree holding
//! shards:
//!
//! ```text
//! data/waymo-e2e/                         # base
//! ├── training/
//! │   ├── training_202504031202.tfrecord-00000-of-00263
//! │   └── ...
//! ├── validation/
//! │   └── val_202504211836.tfrecord-00000-of-00093
//! └── test/
//!     └── test_202504211836.tfrecord-00000-of-00089
//! ```
//!
//! Every file whose name contains `.tfrecord` counts. Paths are sorted, then
//! the first file whose name mentions `training` is used, else `validation`,
//! else `test`, else the first shard overall.
//!
//! ## Framing
//!
//! A shard is a sequence of
//!
//! ```text
//! u64 LE   payload length
//! u32 LE   masked CRC-32C of the length
//! [u8]     payload
//! u32 LE   masked CRC-32C of the payload
//! ```
//!
//! CRC words are read past without verification. Compressed shards are not
//! supported.
//!
//! ## Decoding
//!
//! Turning a payload into a walkable tree is the job of a [`RecordDecoder`].
//! [`JsonTreeDecoder`] reads payloads holding a serde-JSON [`Message`].

use crate::node::{Message, Node};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("No TFRecords under {0}")]
    SourceNotFound(PathBuf),
    #[error("Record {index} truncated: expected {expected} bytes")]
    Truncated { index: usize, expected: u64 },
}

#[derive(Error, Debug)]
#[error("Record does not match the expected message shape: {0}")]
pub struct DecodeError(String);

impl DecodeError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Shard preference by file name, most preferred first.
const SPLIT_ORDER: &[&str] = &["training", "validation", "test"];

fn is_shard(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().contains(".tfrecord"))
        .unwrap_or(false)
}

/// Locate the shard to read under `base`.
pub fn find_shard(base: &Path) -> Result<PathBuf, SourceError> {
    if base.is_file() {
        return Ok(base.to_path_buf());
    }

    let mut shards: Vec<PathBuf> = WalkDir::new(base)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_shard(e.path()))
        .map(|e| e.into_path())
        .collect();
    shards.sort();

    for split in SPLIT_ORDER {
        let preferred = shards.iter().find(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().to_lowercase().contains(split))
                .unwrap_or(false)
        });
        if let Some(path) = preferred {
            return Ok(path.clone());
        }
    }

    shards
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::SourceNotFound(base.to_path_buf()))
}

/// Iterator over the payloads of a TFRecord stream.
pub struct TfRecordReader<R: Read> {
    reader: R,
    index: usize,
    done: bool,
}

impl TfRecordReader<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> TfRecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            index: 0,
            done: false,
        }
    }

    /// Fill `buf` completely. `Ok(false)` on a clean end of stream before the
    /// first byte.
    fn read_exact_or_eof(&mut self, buf: &mut [u8]) -> Result<bool, SourceError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) if filled == 0 => return Ok(false),
                Ok(0) => {
                    return Err(SourceError::Truncated {
                        index: self.index,
                        expected: buf.len() as u64,
                    });
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(true)
    }

    /// One 4-byte CRC word following the length or the payload.
    fn read_crc(&mut self) -> Result<[u8; 4], SourceError> {
        let mut word = [0u8; 4];
        if !self.read_exact_or_eof(&mut word)? {
            return Err(SourceError::Truncated {
                index: self.index,
                expected: 4,
            });
        }
        Ok(word)
    }

    /// Read a payload of the declared length. The buffer only grows with
    /// bytes actually present, so a garbage length header ends in
    /// `Truncated` instead of a huge allocation.
    fn read_payload(&mut self, len: u64) -> Result<Vec<u8>, SourceError> {
        let mut payload = Vec::new();
        (&mut self.reader).take(len).read_to_end(&mut payload)?;
        if (payload.len() as u64) < len {
            return Err(SourceError::Truncated {
                index: self.index,
                expected: len,
            });
        }
        Ok(payload)
    }

    fn next_record(&mut self) -> Result<Option<Vec<u8>>, SourceError> {
        let mut len_bytes = [0u8; 8];
        if !self.read_exact_or_eof(&mut len_bytes)? {
            return Ok(None);
        }
        let len = u64::from_le_bytes(len_bytes);
        let _len_crc = self.read_crc()?;
        let payload = self.read_payload(len)?;
        let _payload_crc = self.read_crc()?;
        self.index += 1;
        Ok(Some(payload))
    }
}

impl<R: Read> Iterator for TfRecordReader<R> {
    type Item = Result<Vec<u8>, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_record() {
            Ok(Some(payload)) => Some(Ok(payload)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Turns raw record bytes into a walkable tree.
pub trait RecordDecoder {
    type Node: Node;

    fn decode(&self, bytes: &[u8]) -> Result<Self::Node, DecodeError>;
}

/// Decoder for payloads holding a JSON-serialized [`Message`].
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonTreeDecoder;

impl RecordDecoder for JsonTreeDecoder {
    type Node = Message;

    fn decode(&self, bytes: &[u8]) -> Result<Message, DecodeError> {
        let mut message: Message =
            serde_json::from_slice(bytes).map_err(|e| DecodeError::new(e.to_string()))?;
        message.reindex();
        Ok(message)
    }
}
