//! I/O module
//!
//! Handles log file reading and transaction output.
//!
//! # Components
//!
//! - `chunk` - Entry-aligned grouping of log lines into chunks
//! - `sync_reader` - Synchronous chunk reader with iterator interface
//! - `async_reader` - Asynchronous chunk reader over tokio I/O
//! - `output` - CSV and JSON lines serialization of normalized transactions

pub mod async_reader;
pub mod chunk;
pub mod output;
pub mod sync_reader;

pub use async_reader::AsyncChunkReader;
pub use chunk::{ChunkBuilder, DEFAULT_CHUNK_LINES};
pub use output::{
    write_transactions, write_transactions_csv, write_transactions_jsonl, TransactionRow,
};
pub use sync_reader::SyncChunkReader;
