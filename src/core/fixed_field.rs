//! Fixed-field channel reconciler
//!
//! This module provides the FixedFieldReconciler, which buffers unmatched
//! fixed-field requests and responses across chunks and pairs them by trace
//! number (field `011`).
//!
//! # Matching
//!
//! Requests are visited in arrival order. For each request with a trace
//! number, the earliest-arrived buffered response with the same trace number
//! is claimed. Requests without a trace number never match, but they are
//! still surfaced as orphans when the buffer is drained.
//!
//! # Buffer Lifecycle
//!
//! - Grows on `process_chunk`
//! - Shrinks when pairs are emitted or the retention cap evicts entries
//! - Emptied by `drain_all` and `reset`

use super::match_keys::fixed_field_trace_key;
use super::retention::RetentionPolicy;
use super::traits::Reconciler;
use crate::display::CrossChannelIndex;
use crate::tokenizer::{FixedFieldTokenizer, Tokenizer};
use crate::types::{Channel, ChunkSummary, Direction, Entry, TransactionPair};
use tracing::{debug, info, warn};

/// Stateful reconciler for the fixed-field channel
#[derive(Debug, Default)]
pub struct FixedFieldReconciler {
    /// Stateless tokenizer for incoming chunks
    tokenizer: FixedFieldTokenizer,

    /// Unmatched requests in arrival order
    requests: Vec<Entry>,

    /// Unmatched responses in arrival order
    responses: Vec<Entry>,

    /// Cap on unmatched entries
    retention: RetentionPolicy,
}

impl FixedFieldReconciler {
    /// Create a new reconciler with an empty, unbounded buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new reconciler whose buffer is capped by `retention`
    ///
    /// # Arguments
    ///
    /// * `retention` - Count-based cap applied after each incremental pass
    pub fn with_retention(retention: RetentionPolicy) -> Self {
        FixedFieldReconciler {
            retention,
            ..Self::default()
        }
    }

    /// Buffered requests, oldest first
    pub fn pending_requests(&self) -> &[Entry] {
        &self.requests
    }

    /// Buffered responses, oldest first
    pub fn pending_responses(&self) -> &[Entry] {
        &self.responses
    }

    /// Pair buffered requests with buffered responses by trace number
    ///
    /// Matched entries leave the buffer; everything else stays in order.
    fn pair_by_trace(&mut self) -> Vec<TransactionPair> {
        let requests = std::mem::take(&mut self.requests);
        let mut pairs = Vec::new();

        for request in requests {
            let matched = fixed_field_trace_key(&request).and_then(|trace| {
                self.responses
                    .iter()
                    .position(|response| fixed_field_trace_key(response) == Some(trace))
            });

            match matched {
                Some(index) => {
                    let response = self.responses.remove(index);
                    pairs.push(TransactionPair::Matched { request, response });
                }
                None => self.requests.push(request),
            }
        }

        pairs
    }

    /// Evict the oldest entries beyond the retention cap as orphan pairs
    fn evict_overflow(&mut self) -> Vec<TransactionPair> {
        let excess_requests = self.retention.overflow(self.requests.len());
        let excess_responses = self.retention.overflow(self.responses.len());

        if excess_requests == 0 && excess_responses == 0 {
            return Vec::new();
        }

        warn!(
            channel = ?Channel::FixedField,
            requests = excess_requests,
            responses = excess_responses,
            "retention cap reached, evicting oldest unmatched entries"
        );

        let mut evicted: Vec<TransactionPair> = self
            .requests
            .drain(..excess_requests)
            .map(TransactionPair::RequestOnly)
            .collect();
        evicted.extend(
            self.responses
                .drain(..excess_responses)
                .map(TransactionPair::ResponseOnly),
        );
        evicted
    }
}

impl Reconciler for FixedFieldReconciler {
    fn channel(&self) -> Channel {
        Channel::FixedField
    }

    /// Tokenize a chunk and append each entry to the list for its direction
    ///
    /// # Returns
    ///
    /// The number of entries added to the buffer
    fn process_chunk(&mut self, raw_text: &str) -> ChunkSummary {
        let entries = self.tokenizer.tokenize(raw_text);
        let new_entry_count = entries.len();

        for entry in entries {
            match entry.direction {
                Direction::Request => self.requests.push(entry),
                Direction::Response => self.responses.push(entry),
            }
        }

        debug!(
            new_entries = new_entry_count,
            pending_requests = self.requests.len(),
            pending_responses = self.responses.len(),
            "fixed-field chunk buffered"
        );

        ChunkSummary { new_entry_count }
    }

    /// Emit every pair that can be completed now
    ///
    /// Requests without a trace number, or whose response has not arrived,
    /// stay buffered. When a retention cap is set, the oldest entries beyond
    /// it are emitted as orphan pairs after pairing.
    fn pair_incremental(&mut self) -> Vec<TransactionPair> {
        let mut pairs = self.pair_by_trace();
        let matched = pairs.len();
        pairs.extend(self.evict_overflow());

        debug!(
            matched,
            evicted = pairs.len() - matched,
            "fixed-field incremental pass"
        );

        pairs
    }

    /// Final pass: pair what still matches, then surface every leftover
    ///
    /// Unmatched requests are emitted without a response, then unclaimed
    /// responses are emitted without a request. The buffer ends empty.
    fn drain_all(&mut self, _context: Option<&CrossChannelIndex>) -> Vec<TransactionPair> {
        let mut pairs = self.pair_by_trace();
        let matched = pairs.len();

        pairs.extend(self.requests.drain(..).map(TransactionPair::RequestOnly));
        pairs.extend(self.responses.drain(..).map(TransactionPair::ResponseOnly));

        info!(
            matched,
            orphans = pairs.len() - matched,
            "fixed-field buffer drained"
        );

        pairs
    }

    fn reset(&mut self) {
        self.requests.clear();
        self.responses.clear();
    }

    fn pending_len(&self) -> usize {
        self.requests.len() + self.responses.len()
    }
}
