//! Normalized transaction types for the Rust Payments Reconciler
//!
//! This module defines the display projection of a reconciled pair. It is
//! derived on demand from a [`TransactionPair`](super::TransactionPair) and
//! never stored by the reconcilers.

use super::entry::Channel;
use rust_decimal::Decimal;
use serde::Serialize;

/// Response code the switch uses for an approved transaction
pub const APPROVED_RESPONSE_CODE: &str = "00";

/// Outcome of a transaction as seen from its response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// No response was paired with the request
    Timeout,

    /// A response exists but carries no response code
    EmptyResponseCode,

    /// Response code `00`
    Success,

    /// Any other response code
    Failed,
}

impl TransactionStatus {
    /// Derive the status from the presence of a response and its code
    pub fn from_response(has_response: bool, response_code: Option<&str>) -> Self {
        match (has_response, response_code) {
            (false, _) => TransactionStatus::Timeout,
            (true, None) => TransactionStatus::EmptyResponseCode,
            (true, Some(APPROVED_RESPONSE_CODE)) => TransactionStatus::Success,
            (true, Some(_)) => TransactionStatus::Failed,
        }
    }
}

/// Channel-independent view of a reconciled transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedTransaction {
    /// Channel the pair came from
    pub source: Channel,

    /// Timestamp of record (request first, response otherwise)
    pub timestamp: Option<String>,

    /// Cross-leg correlation identifier
    pub reference_number: Option<String>,

    /// Per-transaction trace number
    pub trace_number: Option<String>,

    /// Serial number (JSON channel only)
    pub serial_number: Option<String>,

    /// Processing code identifying the transaction category
    pub pcode: Option<String>,

    /// Amount in major currency units, minor digits truncated
    pub amount: Option<Decimal>,

    /// Response code (fixed-field) or response status (JSON), if non-empty
    pub response_code: Option<String>,

    /// Response message (JSON channel only)
    pub response_message: Option<String>,

    /// Terminal identifier (field `041`, or `terminalId` on the JSON channel)
    pub terminal_id: Option<String>,

    /// Derived outcome
    pub status: TransactionStatus,

    /// Raw body of the request, or of the response when there is no request
    pub raw_content: Option<String>,
}
