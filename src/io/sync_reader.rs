//! Synchronous chunk reader with iterator interface
//!
//! Streams a log file line by line and yields entry-aligned chunks of raw
//! text, ready for a reconciler's `process_chunk`.
//!
//! # Design
//!
//! The SyncChunkReader reads raw bytes up to each `\n` so that invalid
//! UTF-8 in a log line degrades to replacement characters instead of
//! aborting the stream. Line grouping is delegated to [`ChunkBuilder`].
//!
//! ```no_run
//! use rust_payments_reconciler::io::sync_reader::SyncChunkReader;
//! use rust_payments_reconciler::tokenizer::FixedFieldTokenizer;
//! use std::path::Path;
//!
//! let reader = SyncChunkReader::open(Path::new("switch.log"), FixedFieldTokenizer, 200).unwrap();
//! for chunk in reader {
//!     match chunk {
//!         Ok(text) => println!("chunk of {} bytes", text.len()),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - A missing file is reported by `open()` as `FileNotFound`
//! - Read failures are yielded once as `Err`, after which the iterator ends

use crate::io::chunk::ChunkBuilder;
use crate::tokenizer::Tokenizer;
use crate::types::ReconcileError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Synchronous reader yielding entry-aligned chunks
#[derive(Debug)]
pub struct SyncChunkReader<R: BufRead, T: Tokenizer> {
    reader: R,
    builder: ChunkBuilder<T>,
    line: Vec<u8>,
    done: bool,
}

impl<T: Tokenizer> SyncChunkReader<BufReader<File>, T> {
    /// Open a log file for chunked reading
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the log file
    /// * `tokenizer` - Tokenizer of the file's channel, used to find entry starts
    /// * `chunk_lines` - Approximate chunk size in lines
    ///
    /// # Returns
    ///
    /// * `Ok(SyncChunkReader)` if the file opened successfully
    /// * `Err(ReconcileError::FileNotFound)` if it does not exist
    /// * `Err(ReconcileError::IoError)` for any other open failure
    pub fn open(path: &Path, tokenizer: T, chunk_lines: usize) -> Result<Self, ReconcileError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ReconcileError::file_not_found(path),
            _ => ReconcileError::from(e),
        })?;

        Ok(Self::new(
            BufReader::with_capacity(8 * 1024, file),
            tokenizer,
            chunk_lines,
        ))
    }
}

impl<R: BufRead, T: Tokenizer> SyncChunkReader<R, T> {
    /// Wrap any buffered reader
    pub fn new(reader: R, tokenizer: T, chunk_lines: usize) -> Self {
        Self {
            reader,
            builder: ChunkBuilder::new(tokenizer, chunk_lines),
            line: Vec::new(),
            done: false,
        }
    }
}

impl<R: BufRead, T: Tokenizer> Iterator for SyncChunkReader<R, T> {
    type Item = Result<String, ReconcileError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.line.clear();
            match self.reader.read_until(b'\n', &mut self.line) {
                Ok(0) => {
                    self.done = true;
                    return self.builder.finish().map(Ok);
                }
                Ok(_) => {
                    let line = String::from_utf8_lossy(&self.line);
                    if let Some(chunk) = self.builder.push_line(&line) {
                        return Some(Ok(chunk));
                    }
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            }
        }
        None
    }
}
