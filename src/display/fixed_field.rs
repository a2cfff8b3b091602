//! Fixed-field pair projection
//!
//! Field tags read by this projection:
//!
//! | Tag   | Meaning           | Read from                 |
//! |-------|-------------------|---------------------------|
//! | `003` | Processing code   | request, then response    |
//! | `004` | Amount            | request, then response    |
//! | `011` | Trace number      | request, then response    |
//! | `037` | Reference number  | request, then response    |
//! | `039` | Response code     | response only             |
//! | `041` | Terminal id       | request, then response    |

use crate::types::{Channel, Entry, NormalizedTransaction, TransactionPair, TransactionStatus};
use rust_decimal::Decimal;

pub const PCODE_TAG: &str = "003";
pub const AMOUNT_TAG: &str = "004";
pub const TRACE_TAG: &str = "011";
pub const REFERENCE_TAG: &str = "037";
pub const RESPONSE_CODE_TAG: &str = "039";
pub const TERMINAL_ID_TAG: &str = "041";

/// First non-empty value of `tag`, request side first
fn either_side(pair: &TransactionPair, tag: &str) -> Option<String> {
    [pair.request(), pair.response()]
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.data_element(tag))
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Parse an amount in minor units into major units
///
/// The last two digits are the minor-unit scale and are dropped, not
/// rounded. Leading whitespace and a sign are accepted; parsing stops at the
/// first non-digit. Returns `None` when no digits remain.
///
/// # Examples
///
/// ```
/// use rust_payments_reconciler::display::parse_minor_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_minor_amount("000000100000"), Some(Decimal::from(1000)));
/// assert_eq!(parse_minor_amount("99"), None);
/// ```
pub fn parse_minor_amount(raw: &str) -> Option<Decimal> {
    let cut = raw.char_indices().rev().nth(1).map_or(0, |(index, _)| index);
    let major = raw[..cut].trim_start();

    let (negative, unsigned) = match major.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, major.strip_prefix('+').unwrap_or(major)),
    };

    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..digits_end];
    if digits.is_empty() {
        return None;
    }

    let amount: Decimal = digits.parse().ok()?;
    Some(if negative { -amount } else { amount })
}

/// Project a fixed-field pair
pub fn project_fixed_field(pair: &TransactionPair) -> NormalizedTransaction {
    let request = pair.request();
    let response = pair.response();

    let response_code = response
        .and_then(|r| r.data_element(RESPONSE_CODE_TAG))
        .filter(|code| !code.is_empty());

    NormalizedTransaction {
        source: Channel::FixedField,
        timestamp: request.or(response).map(|e| e.timestamp.clone()),
        reference_number: either_side(pair, REFERENCE_TAG),
        trace_number: either_side(pair, TRACE_TAG),
        serial_number: None,
        pcode: either_side(pair, PCODE_TAG),
        amount: either_side(pair, AMOUNT_TAG).and_then(|raw| parse_minor_amount(&raw)),
        response_code: response_code.map(str::to_string),
        response_message: None,
        terminal_id: either_side(pair, TERMINAL_ID_TAG),
        status: TransactionStatus::from_response(response.is_some(), response_code),
        raw_content: [request, response]
            .into_iter()
            .flatten()
            .map(|e: &Entry| e.raw_body.as_str())
            .find(|body| !body.is_empty())
            .map(str::to_string),
    }
}
