//! JSON channel tokenizer
//!
//! The JSON log is line oriented. A header line carries a timestamp token and
//! a `REQ`/`RSP` marker; every following line up to the next header belongs to
//! the same entry. The payload is the span between the first `{` and the last
//! `}` of the entry.
//!
//! ```text
//! [2024-01-12 10:15:30.123] <REQ> {"mti":"0200","referenceNumber":"R1",
//!   "pcode":"401000"}
//! 2024-01-12 10:15:31.004 RSP {"data":{"referenceNumber":"R1"}}
//! ```

use super::{is_space, Tokenizer};
use crate::types::{Channel, Direction, Entry, JsonPayload};
use serde_json::{Map, Value};
use tracing::debug;

const MARKERS: [&str; 2] = ["REQ", "RSP"];

/// A recognized JSON channel header line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonHeader<'a> {
    /// Timestamp token, trimmed
    pub timestamp: &'a str,
    /// Direction from the marker
    pub direction: Direction,
}

/// Tokenizer for the JSON channel
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTokenizer;

impl Tokenizer for JsonTokenizer {
    fn channel(&self) -> Channel {
        Channel::Json
    }

    /// Split a chunk into JSON entries
    ///
    /// Lines before the first header are ignored. A malformed payload never
    /// fails the chunk; it is stored as [`JsonPayload::ParseError`].
    fn tokenize(&self, raw_text: &str) -> Vec<Entry> {
        let mut blocks: Vec<(JsonHeader<'_>, String)> = Vec::new();

        for line in raw_text.split('\n') {
            if let Some(header) = parse_header_line(line) {
                blocks.push((header, format!("{}\n", line)));
            } else if let Some((_, content)) = blocks.last_mut() {
                content.push_str(line);
                content.push('\n');
            }
        }

        blocks
            .into_iter()
            .map(|(header, content)| {
                let payload = extract_payload(&content);
                if let JsonPayload::ParseError { message } = &payload {
                    debug!(timestamp = header.timestamp, %message, "malformed JSON payload");
                }
                Entry::json(header.timestamp, header.direction, content, payload)
            })
            .collect()
    }

    fn starts_entry(&self, line: &str) -> bool {
        parse_header_line(line).is_some()
    }
}

/// Recognize a header line
///
/// Shape: optional leading whitespace, optional `[`, a timestamp token of
/// ASCII letters, digits, `_`, whitespace, `:`, `.` or `-`, optional `]`,
/// at least one whitespace, optional `<`, then `REQ` or `RSP`. When several
/// markers qualify, the last one wins so the timestamp token is the longest
/// possible.
pub fn parse_header_line(line: &str) -> Option<JsonHeader<'_>> {
    let mut candidates: Vec<(usize, &str)> = MARKERS
        .iter()
        .flat_map(|marker| line.match_indices(*marker))
        .collect();
    candidates.sort_unstable_by_key(|(pos, _)| *pos);

    candidates.into_iter().rev().find_map(|(pos, marker)| {
        let timestamp = timestamp_before_marker(line, pos)?;
        let direction = Direction::from_marker(marker)?;
        Some(JsonHeader {
            timestamp,
            direction,
        })
    })
}

fn timestamp_before_marker(line: &str, marker_pos: usize) -> Option<&str> {
    let bytes = line.as_bytes();

    let mut cursor = marker_pos;
    if cursor > 0 && bytes[cursor - 1] == b'<' {
        cursor -= 1;
    }

    let separator_end = cursor;
    while cursor > 0 && is_space(bytes[cursor - 1]) {
        cursor -= 1;
    }
    if cursor == separator_end {
        return None;
    }

    let mut token = &line[..cursor];
    if let Some(stripped) = token.strip_suffix(']') {
        token = stripped;
    }
    token = token.trim_start_matches(|c: char| c.is_ascii() && is_space(c as u8));
    if let Some(stripped) = token.strip_prefix('[') {
        token = stripped;
    }

    let valid = !token.is_empty() && token.bytes().all(is_timestamp_byte);
    let timestamp = token.trim();
    (valid && !timestamp.is_empty()).then_some(timestamp)
}

fn is_timestamp_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b':' || byte == b'.' || byte == b'-' || is_space(byte)
}

/// Parse the `{ ... }` span of an entry body
///
/// A body without such a span yields an empty object.
pub fn extract_payload(content: &str) -> JsonPayload {
    let span = content
        .find('{')
        .zip(content.rfind('}'))
        .filter(|(start, end)| end > start);

    match span {
        Some((start, end)) => match serde_json::from_str::<Value>(&content[start..=end]) {
            Ok(value) => JsonPayload::Parsed(value),
            Err(e) => JsonPayload::ParseError {
                message: e.to_string(),
            },
        },
        None => JsonPayload::Parsed(Value::Object(Map::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::bracketed_angle("[2024-01-12 10:15:30.123] <REQ> {}", "2024-01-12 10:15:30.123", Direction::Request)]
    #[case::bare("2024-01-12 10:15:30.123 RSP {}", "2024-01-12 10:15:30.123", Direction::Response)]
    #[case::indented("   12 Jan 2024 10:15:30 <RSP>", "12 Jan 2024 10:15:30", Direction::Response)]
    #[case::word_timestamp("[INFO_2024-01-12T10:15:30] REQ payload", "INFO_2024-01-12T10:15:30", Direction::Request)]
    #[case::marker_inside_payload(r#"2024-01-12 10:15:30 REQ {"type":"RSP"}"#, "2024-01-12 10:15:30", Direction::Request)]
    fn test_parse_header_line(
        #[case] line: &str,
        #[case] timestamp: &str,
        #[case] direction: Direction,
    ) {
        let header = parse_header_line(line).expect("header should match");
        assert_eq!(header.timestamp, timestamp);
        assert_eq!(header.direction, direction);
    }

    #[rstest]
    #[case::body_line(r#"  "pcode": "401000","#)]
    #[case::no_separator("2024-01-12REQ")]
    #[case::no_timestamp("   REQ {}")]
    #[case::brace_in_timestamp("{x} REQ")]
    #[case::empty("")]
    fn test_parse_header_line_rejects(#[case] line: &str) {
        assert!(parse_header_line(line).is_none());
    }

    #[rstest]
    #[case::object(r#"prefix {"a":1} suffix"#, JsonPayload::Parsed(json!({"a": 1})))]
    #[case::nested_spans("{\"a\":{\"b\":2}}\n", JsonPayload::Parsed(json!({"a": {"b": 2}})))]
    #[case::no_braces("no payload here", JsonPayload::Parsed(json!({})))]
    #[case::reversed_braces("} then {", JsonPayload::Parsed(json!({})))]
    fn test_extract_payload(#[case] content: &str, #[case] expected: JsonPayload) {
        assert_eq!(extract_payload(content), expected);
    }

    #[test]
    fn test_extract_payload_marks_malformed_json() {
        let payload = extract_payload(r#"{"referenceNumber": "R1",}"#);
        assert!(payload.is_parse_error());
    }

    #[test]
    fn test_tokenize_multiline_entries() {
        let raw = "startup banner\n\
                   [2024-01-12 10:15:30.123] <REQ> {\"mti\":\"0200\",\n\
                   \"referenceNumber\":\"R1\",\"pcode\":\"401000\"}\n\
                   [2024-01-12 10:15:31.000] <RSP> {\"data\":{\"referenceNumber\":\"R1\"}}\n";
        let entries = JsonTokenizer.tokenize(raw);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].direction, Direction::Request);
        assert_eq!(entries[0].timestamp, "2024-01-12 10:15:30.123");
        assert_eq!(
            entries[0].json_value(),
            Some(&json!({"mti": "0200", "referenceNumber": "R1", "pcode": "401000"}))
        );
        assert!(entries[0].raw_body.ends_with("\"401000\"}\n"));

        assert_eq!(entries[1].direction, Direction::Response);
        assert_eq!(
            entries[1].json_value(),
            Some(&json!({"data": {"referenceNumber": "R1"}}))
        );
    }

    #[test]
    fn test_tokenize_keeps_malformed_entry() {
        let raw = "2024-01-12 10:15:30 REQ {\"pcode\": }\n2024-01-12 10:15:31 RSP {}\n";
        let entries = JsonTokenizer.tokenize(raw);

        assert_eq!(entries.len(), 2);
        assert!(entries[0].payload().is_some_and(JsonPayload::is_parse_error));
        assert_eq!(entries[1].json_value(), Some(&json!({})));
    }

    #[test]
    fn test_tokenize_without_headers_yields_nothing() {
        assert!(JsonTokenizer.tokenize("{\"orphan\": true}\n").is_empty());
    }

    #[test]
    fn test_tokenize_is_idempotent() {
        let raw = "2024-01-12 10:15:30 REQ {\"a\":1}\n2024-01-12 10:15:31 RSP {bad\n";
        assert_eq!(JsonTokenizer.tokenize(raw), JsonTokenizer.tokenize(raw));
    }
}
