//! Sequential browsing over a frame timeline.
//!
//! The browser only holds the frames and a cursor. Rendering and key capture
//! belong to whatever UI drives it, which translates its key names with
//! [`BrowseEvent::from_key`] and calls [`Browser::handle`].

use crate::types::Frame;

/// Navigation input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseEvent {
    Next,
    Previous,
}

impl BrowseEvent {
    /// Map a key name to an event: `n`/`right` advance, `p`/`left` go back.
    /// Anything else is not a browse event.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "n" | "right" => Some(BrowseEvent::Next),
            "p" | "left" => Some(BrowseEvent::Previous),
            _ => None,
        }
    }
}

/// Cursor over a non-empty list of frames.
#[derive(Debug)]
pub struct Browser {
    frames: Vec<Frame>,
    index: usize,
}

impl Browser {
    /// `None` when there is nothing to browse.
    pub fn new(frames: Vec<Frame>) -> Option<Self> {
        if frames.is_empty() {
            return None;
        }
        Some(Self { frames, index: 0 })
    }

    pub fn current(&self) -> &Frame {
        &self.frames[self.index]
    }

    /// Zero-based cursor position.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Advance, stopping at the last frame.
    pub fn next(&mut self) -> &Frame {
        self.index = (self.index + 1).min(self.frames.len() - 1);
        self.current()
    }

    /// Go back, stopping at the first frame.
    pub fn previous(&mut self) -> &Frame {
        self.index = self.index.saturating_sub(1);
        self.current()
    }

    /// Apply an event and return the frame now under the cursor.
    pub fn handle(&mut self, event: BrowseEvent) -> &Frame {
        match event {
            BrowseEvent::Next => self.next(),
            BrowseEvent::Previous => self.previous(),
        }
    }

    /// Title line for the current frame: `"{id}  ts={ts}  {i}/{n}"`.
    pub fn title(&self) -> String {
        let frame = self.current();
        format!(
            "{}  ts={}  {}/{}",
            frame.identifier,
            frame.timestamp_us,
            self.index + 1,
            self.frames.len()
        )
    }
}
