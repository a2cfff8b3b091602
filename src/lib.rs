//! Rust Payments Reconciler Library
//! # Overview
//!
//! This library reconstructs request/response transaction pairs from the raw
//! logs of a payment switch. Two log channels are supported: a fixed-field
//! channel (timestamped headers followed by numbered tag/value fields) and a
//! JSON channel (timestamped `REQ`/`RSP` lines carrying JSON payloads).
//! Logs are consumed incrementally, chunk by chunk, with sync and async
//! ingestion strategies.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Entry, TransactionPair, NormalizedTransaction, etc.)
//! - [`tokenizer`] - Hand-written recognizers splitting raw text into entries
//! - [`core`] - Stateful reconcilers:
//!   - [`core::fixed_field`] - Pairing by trace number
//!   - [`core::json`] - Identified matching followed by greedy fallback
//!   - [`core::match_keys`] - Ordered key-extraction strategies
//! - [`display`] - Projection of pairs into normalized transactions
//! - [`io`] - Chunked log readers and output writers
//! - [`strategy`] - Complete sessions (sync and async)
//! - [`cli`] - CLI arguments parsing
//!
//! # Pair Shapes
//!
//! - **Matched**: a request joined with its response
//! - **Request only**: no response arrived (rendered as a timeout)
//! - **Response only**: a fixed-field response no request claimed
//!
//! # Transaction Status
//!
//! Each normalized transaction carries a status derived from its response:
//! `TIMEOUT` without a response, `EMPTY_RESPONSE_CODE` when the response has
//! no code, `SUCCESS` for code `00` and `FAILED` otherwise.

// Module declarations
pub mod cli;
pub mod core;
pub mod display;
pub mod io;
pub mod strategy;
pub mod tokenizer;
pub mod types;

pub use core::{FixedFieldReconciler, JsonReconciler, Reconciler, RetentionPolicy};
pub use display::{project, CrossChannelIndex};
pub use tokenizer::{FixedFieldTokenizer, JsonTokenizer, Tokenizer};
pub use types::{
    Channel, ChunkSummary, Direction, Entry, NormalizedTransaction, ReconcileError,
    TransactionPair, TransactionStatus,
};
