//! Entry-aligned chunk assembly
//!
//! Log files are fed to the reconcilers in chunks of roughly `chunk_lines`
//! lines. A chunk is only cut before a line that opens a new entry for the
//! channel, so an entry never straddles two chunks. A single entry longer
//! than `chunk_lines` therefore yields a longer chunk.
//!
//! Lines before the first entry start stay with that entry's chunk, so
//! leading noise is never tokenized on its own.
//!
//! The builder is shared by the sync and async readers; it holds no I/O.

use crate::tokenizer::Tokenizer;

/// Default approximate chunk size in lines
pub const DEFAULT_CHUNK_LINES: usize = 200;

/// Accumulates lines into entry-aligned chunks
#[derive(Debug)]
pub struct ChunkBuilder<T: Tokenizer> {
    tokenizer: T,
    chunk_lines: usize,
    buffer: String,
    lines: usize,
    has_entry: bool,
}

impl<T: Tokenizer> ChunkBuilder<T> {
    /// Create a builder cutting chunks of at least `chunk_lines` lines
    ///
    /// A `chunk_lines` of zero is treated as one.
    pub fn new(tokenizer: T, chunk_lines: usize) -> Self {
        Self {
            tokenizer,
            chunk_lines: chunk_lines.max(1),
            buffer: String::new(),
            lines: 0,
            has_entry: false,
        }
    }

    /// Add one line (with its terminator, if any)
    ///
    /// Returns the completed chunk when this line opens a new entry and the
    /// buffer already holds enough lines. The line itself starts the next chunk.
    pub fn push_line(&mut self, line: &str) -> Option<String> {
        let starts_entry = self.tokenizer.starts_entry(line);

        let completed = if starts_entry && self.has_entry && self.lines >= self.chunk_lines {
            self.lines = 0;
            Some(std::mem::take(&mut self.buffer))
        } else {
            None
        };

        self.has_entry |= starts_entry;
        self.buffer.push_str(line);
        self.lines += 1;
        completed
    }

    /// Flush what is left at end of input
    pub fn finish(&mut self) -> Option<String> {
        self.lines = 0;
        self.has_entry = false;
        if self.buffer.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buffer))
        }
    }
}
