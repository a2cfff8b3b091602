//! Match-key extraction strategies
//!
//! Response payloads vary in shape by message type, so a key is probed at
//! several locations. Each location is a pure extractor over a JSON value;
//! extractors are tried in the order listed and the first present key wins.
//! A key is present only when it is truthy: a non-empty string, a non-zero
//! number, `true`, an array or an object.

use crate::types::Entry;
use serde_json::Value;

/// Message-type indicator of network-management requests (sign-on, echo)
pub const NETWORK_MANAGEMENT_MTI: &str = "0800";

/// Fixed-field tag holding the trace number
pub const TRACE_NUMBER_TAG: &str = "011";

/// A pure key extractor over a JSON value
pub type KeyExtractor = fn(&Value) -> Option<&Value>;

/// Where a response's trace number may live, relative to the whole payload
pub const RESPONSE_TRACE_STRATEGIES: &[KeyExtractor] = &[nested_trace_number];

/// Where a response's reference number may live, relative to its payload root
pub const RESPONSE_REFERENCE_STRATEGIES: &[KeyExtractor] =
    &[transaction_info_reference, direct_reference];

/// Keys whose presence makes a response identifiable, relative to its payload root
pub const IDENTIFYING_KEYS: &[KeyExtractor] =
    &[direct_reference, direct_trace_number, transaction_info_reference];

/// Identifying key of a JSON request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RequestKey<'a> {
    /// Network-management request, matched by trace number
    Trace(&'a Value),

    /// Any other request, matched by reference number
    ///
    /// The pcode is required for the key to exist but is not compared.
    Reference {
        /// Reference number
        reference: &'a Value,
        /// Processing code
        pcode: &'a Value,
    },
}

/// JavaScript-style truthiness of a JSON value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| is_truthy(v))
}

/// `data.traceNumber`
pub fn nested_trace_number(payload: &Value) -> Option<&Value> {
    present(payload.get("data")?.get("traceNumber"))
}

/// `traceNumber`
pub fn direct_trace_number(root: &Value) -> Option<&Value> {
    present(root.get("traceNumber"))
}

/// `transactionInfo.referenceNumber`
pub fn transaction_info_reference(root: &Value) -> Option<&Value> {
    present(root.get("transactionInfo")?.get("referenceNumber"))
}

/// `referenceNumber`
pub fn direct_reference(root: &Value) -> Option<&Value> {
    present(root.get("referenceNumber"))
}

/// Apply extractors in order; the first present key wins
pub fn first_key<'a>(value: &'a Value, strategies: &[KeyExtractor]) -> Option<&'a Value> {
    strategies.iter().find_map(|extract| extract(value))
}

/// Root of a response payload: the nested `data` object when present, else the payload
pub fn response_root(payload: &Value) -> &Value {
    present(payload.get("data")).unwrap_or(payload)
}

/// Identifying key of a JSON request
///
/// Network-management requests are keyed by trace number only, even when
/// they also carry a reference number.
pub fn request_key(entry: &Entry) -> Option<RequestKey<'_>> {
    let payload = entry.json_value()?;

    if payload.get("mti").and_then(Value::as_str) == Some(NETWORK_MANAGEMENT_MTI) {
        return present(payload.get("traceNumber")).map(RequestKey::Trace);
    }

    let reference = present(payload.get("referenceNumber"))?;
    let pcode = present(payload.get("pcode"))?;
    Some(RequestKey::Reference { reference, pcode })
}

/// Trace number of a JSON response
pub fn response_trace_key(entry: &Entry) -> Option<&Value> {
    first_key(entry.json_value()?, RESPONSE_TRACE_STRATEGIES)
}

/// Reference number of a JSON response
pub fn response_reference_key(entry: &Entry) -> Option<&Value> {
    first_key(response_root(entry.json_value()?), RESPONSE_REFERENCE_STRATEGIES)
}

/// Whether a response carries no identifying key at all
///
/// Responses whose payload failed to parse are anonymous.
pub fn is_anonymous(entry: &Entry) -> bool {
    entry
        .json_value()
        .map_or(true, |payload| first_key(response_root(payload), IDENTIFYING_KEYS).is_none())
}

/// Whether a response answers a request with the given key
pub fn response_matches(key: &RequestKey<'_>, response: &Entry) -> bool {
    match key {
        RequestKey::Trace(trace) => response_trace_key(response) == Some(*trace),
        RequestKey::Reference { reference, .. } => {
            response_reference_key(response) == Some(*reference)
        }
    }
}

/// Trace number of a fixed-field entry (tag `011`), if non-empty
pub fn fixed_field_trace_key(entry: &Entry) -> Option<&str> {
    entry
        .data_element(TRACE_NUMBER_TAG)
        .filter(|trace| !trace.is_empty())
}
