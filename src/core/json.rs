//! JSON channel reconciler
//!
//! This module provides the JsonReconciler, which keeps one arrival-ordered
//! buffer of unmatched JSON entries (both directions interleaved) and pairs
//! them in two phases.
//!
//! # Phase 1: Identified Matching
//!
//! Each request, in arrival order, takes the earliest buffered response that
//! carries its key:
//! 1. Network-management requests (`mti` `0800`) match on trace number,
//!    read from the response's nested `data` object.
//! 2. Other requests need both a reference number and a pcode, and match on
//!    reference number, read from the response's `transactionInfo` or top level.
//!
//! # Phase 2: Greedy Fallback
//!
//! Requests still unmatched take, in arrival order, the earliest remaining
//! response that carries no identifying key at all. The switch emits such
//! anonymous responses for some errors. This pairing is a heuristic: it
//! assumes anonymous responses are rare and roughly FIFO with their requests,
//! and nothing checks that the response really belongs to the request.
//!
//! Phase 1 always completes before phase 2 starts, so a request whose
//! identified response is buffered never takes an anonymous one.

use super::match_keys::{is_anonymous, request_key, response_matches};
use super::retention::RetentionPolicy;
use super::traits::Reconciler;
use crate::display::CrossChannelIndex;
use crate::tokenizer::{JsonTokenizer, Tokenizer};
use crate::types::{Channel, ChunkSummary, Entry, TransactionPair};
use tracing::{debug, info, warn};

/// Outcome of one matching pass over the buffer
#[derive(Debug, Default)]
pub struct MatchOutcome {
    /// Pairs completed in this pass (phase 1 pairs first)
    pub pairs: Vec<TransactionPair>,

    /// Requests left without a response, in arrival order
    pub unmatched_requests: Vec<Entry>,

    /// Responses left unclaimed, in arrival order
    pub unmatched_responses: Vec<Entry>,
}

/// Phase 1: pair requests with responses carrying their identifying key
///
/// Claimed responses are removed from `responses`. Returns the pairs and the
/// requests that found no identified response.
pub fn match_identified(
    requests: Vec<Entry>,
    responses: &mut Vec<Entry>,
) -> (Vec<TransactionPair>, Vec<Entry>) {
    let mut pairs = Vec::new();
    let mut unmatched = Vec::new();

    for request in requests {
        let matched = request_key(&request)
            .and_then(|key| responses.iter().position(|response| response_matches(&key, response)));

        match matched {
            Some(index) => {
                let response = responses.remove(index);
                pairs.push(TransactionPair::Matched { request, response });
            }
            None => unmatched.push(request),
        }
    }

    (pairs, unmatched)
}

/// Phase 2: pair leftover requests with anonymous responses, first come first served
///
/// Claimed responses are removed from `responses`. Returns the pairs and the
/// requests that found no anonymous response.
pub fn match_anonymous(
    requests: Vec<Entry>,
    responses: &mut Vec<Entry>,
) -> (Vec<TransactionPair>, Vec<Entry>) {
    let mut pairs = Vec::new();
    let mut unmatched = Vec::new();

    for request in requests {
        match responses.iter().position(is_anonymous) {
            Some(index) => {
                let response = responses.remove(index);
                debug!(
                    request_ts = %request.timestamp,
                    response_ts = %response.timestamp,
                    "paired request with anonymous response"
                );
                pairs.push(TransactionPair::Matched { request, response });
            }
            None => unmatched.push(request),
        }
    }

    (pairs, unmatched)
}

/// Run both phases over a set of buffered entries
pub fn match_entries(entries: Vec<Entry>) -> MatchOutcome {
    let (requests, mut responses): (Vec<Entry>, Vec<Entry>) =
        entries.into_iter().partition(Entry::is_request);

    let (mut pairs, provisional) = match_identified(requests, &mut responses);
    let (fallback_pairs, unmatched_requests) = match_anonymous(provisional, &mut responses);

    if !fallback_pairs.is_empty() {
        warn!(
            count = fallback_pairs.len(),
            "paired requests with anonymous responses by arrival order"
        );
    }
    pairs.extend(fallback_pairs);

    MatchOutcome {
        pairs,
        unmatched_requests,
        unmatched_responses: responses,
    }
}

/// Stateful reconciler for the JSON channel
#[derive(Debug, Default)]
pub struct JsonReconciler {
    /// Stateless tokenizer for incoming chunks
    tokenizer: JsonTokenizer,

    /// Unmatched entries of both directions
    entries: Vec<Entry>,

    /// Cap on unmatched entries
    retention: RetentionPolicy,
}

impl JsonReconciler {
    /// Create a new reconciler with an empty, unbounded buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new reconciler whose buffer is capped by `retention`
    pub fn with_retention(retention: RetentionPolicy) -> Self {
        JsonReconciler {
            retention,
            ..Self::default()
        }
    }

    /// Buffered entries
    pub fn pending(&self) -> &[Entry] {
        &self.entries
    }

    /// Apply the retention cap to what a pass left over
    ///
    /// Evicted requests become orphan pairs; evicted responses are dropped,
    /// as unclaimed JSON responses are at drain time.
    fn retain(&mut self, mut requests: Vec<Entry>, mut responses: Vec<Entry>) -> Vec<TransactionPair> {
        let excess_requests = self.retention.overflow(requests.len());
        let excess_responses = self.retention.overflow(responses.len());

        if excess_requests > 0 || excess_responses > 0 {
            warn!(
                channel = ?Channel::Json,
                requests = excess_requests,
                responses = excess_responses,
                "retention cap reached, evicting oldest unmatched entries"
            );
        }

        let evicted = requests
            .drain(..excess_requests)
            .map(TransactionPair::RequestOnly)
            .collect();
        responses.drain(..excess_responses);

        self.entries = requests;
        self.entries.extend(responses);
        evicted
    }
}

impl Reconciler for JsonReconciler {
    fn channel(&self) -> Channel {
        Channel::Json
    }

    /// Tokenize a chunk and append its entries; no pairing happens here
    fn process_chunk(&mut self, raw_text: &str) -> ChunkSummary {
        let entries = self.tokenizer.tokenize(raw_text);
        let new_entry_count = entries.len();
        self.entries.extend(entries);

        debug!(
            new_entries = new_entry_count,
            pending = self.entries.len(),
            "json chunk buffered"
        );

        ChunkSummary { new_entry_count }
    }

    /// Run both matching phases over the buffer and emit completed pairs
    ///
    /// Unmatched requests and unclaimed responses stay buffered. A response
    /// that is neither anonymous nor claimed stays until drained or reset.
    fn pair_incremental(&mut self) -> Vec<TransactionPair> {
        let outcome = match_entries(std::mem::take(&mut self.entries));
        let mut pairs = outcome.pairs;
        let matched = pairs.len();

        pairs.extend(self.retain(outcome.unmatched_requests, outcome.unmatched_responses));

        debug!(
            matched,
            evicted = pairs.len() - matched,
            pending = self.entries.len(),
            "json incremental pass"
        );

        pairs
    }

    /// Final pass: run both phases, then emit unmatched requests as orphans
    ///
    /// Unclaimed responses are logged and dropped, not surfaced as pairs.
    /// `context` holds the finalized fixed-field transactions; it is reserved
    /// for cross-channel correlation and does not affect matching.
    fn drain_all(&mut self, context: Option<&CrossChannelIndex>) -> Vec<TransactionPair> {
        if let Some(index) = context {
            debug!(
                cross_channel_keys = index.len(),
                "json drain with cross-channel context"
            );
        }

        let outcome = match_entries(std::mem::take(&mut self.entries));
        let mut pairs = outcome.pairs;
        let matched = pairs.len();

        pairs.extend(
            outcome
                .unmatched_requests
                .into_iter()
                .map(TransactionPair::RequestOnly),
        );

        if !outcome.unmatched_responses.is_empty() {
            warn!(
                dropped = outcome.unmatched_responses.len(),
                "unpaired json responses discarded at drain"
            );
        }

        info!(
            matched,
            orphans = pairs.len() - matched,
            "json buffer drained"
        );

        pairs
    }

    fn reset(&mut self) {
        self.entries.clear();
    }

    fn pending_len(&self) -> usize {
        self.entries.len()
    }
}
