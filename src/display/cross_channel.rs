//! Cross-channel correlation index
//!
//! A logical transaction may appear on both channels. This index maps the
//! `(reference number, pcode)` key of each finalized fixed-field transaction
//! to its projection, and is handed to the JSON reconciler at drain time.

use crate::types::NormalizedTransaction;
use std::collections::HashMap;

/// Correlation key: reference number and processing code
pub type CrossChannelKey = (String, String);

/// Finalized fixed-field transactions keyed by reference number and pcode
#[derive(Debug, Clone, Default)]
pub struct CrossChannelIndex {
    entries: HashMap<CrossChannelKey, NormalizedTransaction>,
}

impl CrossChannelIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from finalized transactions
    ///
    /// Transactions missing either key part, or with an empty one, are
    /// skipped. When two transactions share a key the later one wins.
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a NormalizedTransaction>,
    {
        let mut index = Self::new();
        for transaction in transactions {
            index.insert(transaction.clone());
        }
        index
    }

    /// Insert one transaction; returns whether it carried a usable key
    pub fn insert(&mut self, transaction: NormalizedTransaction) -> bool {
        let key = match (&transaction.reference_number, &transaction.pcode) {
            (Some(reference), Some(pcode)) if !reference.is_empty() && !pcode.is_empty() => {
                (reference.clone(), pcode.clone())
            }
            _ => return false,
        };
        self.entries.insert(key, transaction);
        true
    }

    /// Look up the transaction for a reference number and pcode
    pub fn get(&self, reference: &str, pcode: &str) -> Option<&NormalizedTransaction> {
        self.entries.get(&(reference.to_string(), pcode.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
