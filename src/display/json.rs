//! JSON pair projection
//!
//! Request-side fields are read from the top level of the request payload,
//! response-side fields from the top level of the response payload. Entries
//! whose payload failed to parse contribute nothing.

use crate::types::{Channel, Entry, NormalizedTransaction, TransactionPair, TransactionStatus};
use serde_json::Value;

/// Render a scalar JSON value as display text
///
/// Strings are taken verbatim, `null` is absent, anything else is rendered
/// as compact JSON.
pub fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn field(entry: Option<&Entry>, key: &str) -> Option<String> {
    entry
        .and_then(Entry::json_value)
        .and_then(|payload| payload.get(key))
        .and_then(json_text)
}

/// Project a JSON pair
///
/// The request's timestamp is the pair's timestamp of record; a pair
/// without a request falls back to the response's.
pub fn project_json(pair: &TransactionPair) -> NormalizedTransaction {
    let request = pair.request();
    let response = pair.response();

    let response_code = field(response, "responseStatus").filter(|code| !code.is_empty());
    let status = TransactionStatus::from_response(response.is_some(), response_code.as_deref());

    NormalizedTransaction {
        source: Channel::Json,
        timestamp: request.or(response).map(|e| e.timestamp.clone()),
        reference_number: field(request, "referenceNumber"),
        trace_number: field(request, "traceNumber"),
        serial_number: field(request, "serialNumber"),
        pcode: field(request, "pcode"),
        amount: None,
        response_code,
        response_message: field(response, "responseMessage"),
        terminal_id: field(request, "terminalId"),
        status,
        raw_content: request.or(response).map(|e| e.raw_body.clone()),
    }
}
