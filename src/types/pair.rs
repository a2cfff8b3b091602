//! Transaction pair types
//!
//! A pair is what the reconcilers emit: a request joined with its response,
//! or one side on its own when no counterpart was found. The enum shape makes
//! an empty pair unrepresentable.

use super::entry::{Channel, Entry};

/// A reconciled request/response pair
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionPair {
    /// Request joined with its response
    Matched {
        /// The request entry
        request: Entry,
        /// The response entry
        response: Entry,
    },

    /// Request for which no response was found (orphan request)
    RequestOnly(Entry),

    /// Response never claimed by any request (orphan response)
    ResponseOnly(Entry),
}

impl TransactionPair {
    /// Build a pair from optional sides
    ///
    /// Returns `None` when both sides are absent.
    pub fn from_parts(request: Option<Entry>, response: Option<Entry>) -> Option<Self> {
        match (request, response) {
            (Some(request), Some(response)) => Some(TransactionPair::Matched { request, response }),
            (Some(request), None) => Some(TransactionPair::RequestOnly(request)),
            (None, Some(response)) => Some(TransactionPair::ResponseOnly(response)),
            (None, None) => None,
        }
    }

    pub fn request(&self) -> Option<&Entry> {
        match self {
            TransactionPair::Matched { request, .. } | TransactionPair::RequestOnly(request) => {
                Some(request)
            }
            TransactionPair::ResponseOnly(_) => None,
        }
    }

    pub fn response(&self) -> Option<&Entry> {
        match self {
            TransactionPair::Matched { response, .. } | TransactionPair::ResponseOnly(response) => {
                Some(response)
            }
            TransactionPair::RequestOnly(_) => None,
        }
    }

    /// Whether one side of the pair is missing
    pub fn is_orphan(&self) -> bool {
        !matches!(self, TransactionPair::Matched { .. })
    }

    /// Channel of the entries in this pair
    pub fn channel(&self) -> Channel {
        match self {
            TransactionPair::Matched { request, .. }
            | TransactionPair::RequestOnly(request)
            | TransactionPair::ResponseOnly(request) => request.channel(),
        }
    }

    /// Split into `(request, response)`
    pub fn into_parts(self) -> (Option<Entry>, Option<Entry>) {
        match self {
            TransactionPair::Matched { request, response } => (Some(request), Some(response)),
            TransactionPair::RequestOnly(request) => (Some(request), None),
            TransactionPair::ResponseOnly(response) => (None, Some(response)),
        }
    }
}

/// Result of feeding one raw chunk to a reconciler
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChunkSummary {
    /// Number of entries tokenized from the chunk and buffered
    pub new_entry_count: usize,
}
