//! Retention policy for pending buffers
//!
//! Unmatched entries stay buffered until a counterpart arrives. Without a
//! cap a stream that never answers some requests grows the buffer forever,
//! so callers may bound it by count. The default is unbounded.

/// Count-based cap on unmatched entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Maximum unmatched entries kept per direction; `None` keeps everything
    pub max_pending: Option<usize>,
}

impl RetentionPolicy {
    /// Keep every unmatched entry until drained or reset
    pub fn unbounded() -> Self {
        Self { max_pending: None }
    }

    /// Keep at most `max_pending` unmatched entries per direction
    pub fn capped(max_pending: usize) -> Self {
        Self {
            max_pending: Some(max_pending),
        }
    }

    /// Number of oldest entries to evict from a list of `pending` entries
    pub fn overflow(&self, pending: usize) -> usize {
        self.max_pending
            .map_or(0, |max| pending.saturating_sub(max))
    }
}
