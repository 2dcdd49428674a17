//! Buffered input sources, and the stack of them being tokenized.
//!
//! Each stream is read to completion when it is pushed.
//! Only the top of the stack is scanned; pushing a stream (e.g. for an included file)
//! suspends the one beneath it, and popping resumes it where it left off.
//! Streams are never popped automatically; the driver sees the end of a stream, and decides.

use std::io::Read;

use crate::error::{Error, Result};

/// Name for streams pushed without one.
pub const UNNAMED: &str = "<input>";

/// A position in an input stream.
/// Lines and columns are 1-indexed; columns count characters, not bytes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    /// Byte offset from the start of the stream.
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Default for Location {
    fn default() -> Self {
        Location {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl Location {
    /// Move past the given text.
    /// Tabs still count as a single column.
    pub(crate) fn advance(&mut self, text: &str) {
        self.offset += text.len();
        match text.rfind('\n') {
            Some(last_newline) => {
                self.line += text.bytes().filter(|&b| b == b'\n').count();
                self.column = text[last_newline + 1..].chars().count() + 1;
            }
            None => self.column += text.chars().count(),
        }
    }
}

/// One fully-buffered input source.
#[derive(Debug)]
pub struct InputStream {
    name: String,
    content: String,
    /// Byte offset of the unconsumed suffix.
    cursor: usize,
    location: Location,
    exhausted: bool,
}

impl InputStream {
    pub fn new(name: impl Into<String>, content: String) -> Self {
        let exhausted = content.is_empty();
        InputStream {
            name: name.into(),
            content,
            cursor: 0,
            location: Location::default(),
            exhausted,
        }
    }

    /// Read the source to completion.
    pub fn read(name: impl Into<String>, mut source: impl Read) -> Result<Self> {
        let name = name.into();
        let mut bytes = Vec::new();
        source.read_to_end(&mut bytes)?;
        let content = String::from_utf8(bytes).map_err(|source| Error::Encoding {
            stream: name.clone(),
            source,
        })?;
        Ok(Self::new(name, content))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The unconsumed suffix.
    pub fn remaining(&self) -> &str {
        &self.content[self.cursor..]
    }

    /// Position of the start of the unconsumed suffix.
    pub fn location(&self) -> Location {
        self.location
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Consume `len` bytes; `len` must end on a character boundary.
    /// Consuming the last byte exhausts the stream.
    pub(crate) fn advance(&mut self, len: usize) {
        let end = self.cursor + len;
        self.location.advance(&self.content[self.cursor..end]);
        self.cursor = end;
        if self.cursor == self.content.len() {
            self.exhausted = true;
        }
    }
}

/// The stack of input streams. The last-pushed stream is active.
#[derive(Debug, Default)]
pub struct InputStack {
    streams: Vec<InputStream>,
}

impl InputStack {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push(&mut self, stream: InputStream) {
        tracing::trace!(
            "pushing input stream {:?} ({} bytes) at depth {}",
            stream.name,
            stream.content.len(),
            self.streams.len()
        );
        self.streams.push(stream);
    }

    /// Discard the active stream. The one beneath it, if any, becomes active.
    pub fn pop(&mut self) -> Option<InputStream> {
        let stream = self.streams.pop();
        if let Some(stream) = &stream {
            tracing::trace!(
                "popped input stream {:?} at offset {}",
                stream.name,
                stream.cursor
            );
        }
        stream
    }

    pub fn top(&self) -> Option<&InputStream> {
        self.streams.last()
    }

    pub(crate) fn top_mut(&mut self) -> Option<&mut InputStream> {
        self.streams.last_mut()
    }

    pub fn depth(&self) -> usize {
        self.streams.len()
    }
}
