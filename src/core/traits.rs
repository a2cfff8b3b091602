//! Core trait for channel reconcilers
//!
//! This module defines the trait abstraction that lets the ingestion
//! strategies drive the fixed-field and JSON reconcilers through one loop.

use crate::display::CrossChannelIndex;
use crate::types::{Channel, ChunkSummary, TransactionPair};

/// Trait for stateful request/response reconciliation over one channel
///
/// An instance owns its pending buffer. Calls mutate that buffer without
/// locking, so one instance must be driven by one caller at a time.
pub trait Reconciler {
    /// Channel this reconciler handles
    fn channel(&self) -> Channel;

    /// Tokenize a raw chunk and buffer its entries
    fn process_chunk(&mut self, raw_text: &str) -> ChunkSummary;

    /// Emit the pairs that can be completed from the current buffer
    ///
    /// Entries that cannot be paired yet stay buffered.
    fn pair_incremental(&mut self) -> Vec<TransactionPair>;

    /// Pair what is left one final time and empty the buffer
    ///
    /// `context` carries the finalized transactions of the other channel.
    fn drain_all(&mut self, context: Option<&CrossChannelIndex>) -> Vec<TransactionPair>;

    /// Discard every buffered entry
    fn reset(&mut self);

    /// Number of entries currently buffered
    fn pending_len(&self) -> usize;
}
