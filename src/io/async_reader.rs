//! Asynchronous chunk reader
//!
//! Provides the same entry-aligned chunking as the sync reader over a tokio
//! buffered reader, for use inside per-channel tasks.
//!
//! # Design
//!
//! The AsyncChunkReader uses:
//! - tokio `AsyncBufReadExt::read_until` for line reads
//! - [`ChunkBuilder`] for grouping lines into chunks
//!
//! ```text
//! tokio File → BufReader → AsyncChunkReader → entry-aligned chunks
//!                                ↓
//!                          ChunkBuilder
//! ```

use crate::io::chunk::ChunkBuilder;
use crate::tokenizer::Tokenizer;
use crate::types::ReconcileError;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Asynchronous reader yielding entry-aligned chunks
pub struct AsyncChunkReader<R: AsyncBufRead + Unpin, T: Tokenizer> {
    reader: R,
    builder: ChunkBuilder<T>,
    line: Vec<u8>,
    done: bool,
}

impl<T: Tokenizer> AsyncChunkReader<BufReader<File>, T> {
    /// Open a log file for chunked reading
    ///
    /// # Returns
    ///
    /// * `Ok(AsyncChunkReader)` if the file opened successfully
    /// * `Err(ReconcileError::FileNotFound)` if it does not exist
    pub async fn open(path: &Path, tokenizer: T, chunk_lines: usize) -> Result<Self, ReconcileError> {
        let file = File::open(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ReconcileError::file_not_found(path),
            _ => ReconcileError::from(e),
        })?;

        Ok(Self::new(BufReader::new(file), tokenizer, chunk_lines))
    }
}

impl<R: AsyncBufRead + Unpin, T: Tokenizer> AsyncChunkReader<R, T> {
    /// Wrap any async buffered reader
    pub fn new(reader: R, tokenizer: T, chunk_lines: usize) -> Self {
        Self {
            reader,
            builder: ChunkBuilder::new(tokenizer, chunk_lines),
            line: Vec::new(),
            done: false,
        }
    }

    /// Read the next chunk
    ///
    /// # Returns
    ///
    /// * `Ok(Some(chunk))` - The next entry-aligned chunk
    /// * `Ok(None)` - End of input
    /// * `Err(ReconcileError::IoError)` - A read failed; later calls return `Ok(None)`
    pub async fn next_chunk(&mut self) -> Result<Option<String>, ReconcileError> {
        while !self.done {
            self.line.clear();
            let read = match self.reader.read_until(b'\n', &mut self.line).await {
                Ok(read) => read,
                Err(e) => {
                    self.done = true;
                    return Err(e.into());
                }
            };

            if read == 0 {
                self.done = true;
                return Ok(self.builder.finish());
            }

            let line = String::from_utf8_lossy(&self.line);
            if let Some(chunk) = self.builder.push_line(&line) {
                return Ok(Some(chunk));
            }
        }
        Ok(None)
    }
}
