//! Fixed-field channel tokenizer
//!
//! Entries in the fixed-field log start with a header made of a timestamp,
//! optionally bracketed, optionally followed by a message-type indicator in
//! angle brackets:
//!
//! ```text
//! [12 Jan 2024 10:15:30.123] <0200>
//! Field 002: [4111111111111111]
//! Field 011: [123456]
//! 2024-01-12 10:15:31.004 <0210>
//! 039 [00]
//! ```
//!
//! # Grammar
//!
//! ```text
//! header    := "["? timestamp "]"? (WS* "<" D{4} ">")?
//! timestamp := D{1,2} WS+ A{3} WS+ D{4} WS+ [D:.]+
//!            | [D-]{10} WS+ [D:.]{8,}
//! field     := ("Field" WS+)? D{3} [: \t]+ "["? value "]"?
//! value     := one or more characters up to "]", CR, LF or end of body
//! ```
//!
//! Headers may appear anywhere in the text; the text between the end of one
//! header and the start of the next is the body of the earlier entry. Text
//! before the first header is not part of any entry.
//!
//! A field separator never crosses a line break, so a tag with an empty value
//! cannot swallow the field on the following line.

use super::{count_while, is_space, Tokenizer};
use crate::types::{Channel, DataElements, Entry, DEFAULT_MTI};
use chrono::{SecondsFormat, Utc};
use tracing::debug;

/// Literal prefix accepted before a field tag
const FIELD_PREFIX: &str = "Field";

/// A recognized entry header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderMatch<'a> {
    /// Byte offset where the header starts (including an opening bracket)
    pub start: usize,
    /// Byte offset just past the header
    pub end: usize,
    /// Timestamp text, trimmed
    pub timestamp: &'a str,
    /// Message-type indicator, if the header carried one
    pub mti: Option<&'a str>,
}

/// A recognized tagged field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMatch<'a> {
    /// 3-digit field tag
    pub tag: &'a str,
    /// Field value, trimmed
    pub value: &'a str,
    /// Byte offset just past the field
    pub end: usize,
}

/// Tokenizer for the fixed-field channel
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedFieldTokenizer;

impl Tokenizer for FixedFieldTokenizer {
    fn channel(&self) -> Channel {
        Channel::FixedField
    }

    /// Split a chunk into fixed-field entries
    ///
    /// Empty or whitespace-only input yields no entries. Non-empty input with
    /// no recognizable header yields exactly one request entry holding the
    /// whole input, stamped with the current processing time.
    fn tokenize(&self, raw_text: &str) -> Vec<Entry> {
        let headers = scan_headers(raw_text);

        let Some(first) = headers.first() else {
            if raw_text.trim().is_empty() {
                return Vec::new();
            }
            debug!(
                bytes = raw_text.len(),
                "no fixed-field header found, emitting fallback entry"
            );
            return vec![Entry::fixed_field(
                Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                DEFAULT_MTI,
                raw_text,
                parse_fields(raw_text),
            )];
        };

        if !raw_text[..first.start].trim().is_empty() {
            debug!(
                bytes = first.start,
                "discarding text before first fixed-field header"
            );
        }

        headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let body_end = headers.get(i + 1).map_or(raw_text.len(), |next| next.start);
                let body = &raw_text[header.end..body_end];
                Entry::fixed_field(
                    header.timestamp,
                    header.mti.unwrap_or(DEFAULT_MTI),
                    body,
                    parse_fields(body),
                )
            })
            .collect()
    }

    fn starts_entry(&self, line: &str) -> bool {
        let trimmed = line.trim_start();
        !trimmed.is_empty() && match_header_at(trimmed, 0).is_some()
    }
}

/// Find every header in `text`, left to right, without overlaps
pub fn scan_headers(text: &str) -> Vec<HeaderMatch<'_>> {
    let mut headers = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        match match_header_at(text, pos) {
            Some(header) => {
                pos = header.end;
                headers.push(header);
            }
            None => pos += 1,
        }
    }

    headers
}

/// Try to recognize a header starting exactly at `pos`
pub fn match_header_at(text: &str, pos: usize) -> Option<HeaderMatch<'_>> {
    let bytes = text.as_bytes();
    let mut cursor = pos;

    if bytes.get(cursor) == Some(&b'[') {
        cursor += 1;
    }

    let ts_start = cursor;
    let ts_end = match_day_month_timestamp(bytes, cursor)
        .or_else(|| match_numeric_date_timestamp(bytes, cursor))?;
    cursor = ts_end;

    if bytes.get(cursor) == Some(&b']') {
        cursor += 1;
    }

    let mut mti = None;
    if let Some(mti_start) = match_mti(bytes, cursor) {
        mti = Some(&text[mti_start..mti_start + 4]);
        cursor = mti_start + 5;
    }

    Some(HeaderMatch {
        start: pos,
        end: cursor,
        timestamp: text[ts_start..ts_end].trim(),
        mti,
    })
}

/// `D{1,2} WS+ A{3} WS+ D{4} WS+ [D:.]+`, e.g. `12 Jan 2024 10:15:30.123`
fn match_day_month_timestamp(bytes: &[u8], pos: usize) -> Option<usize> {
    let day = count_while(bytes, pos, 2, |b| b.is_ascii_digit());
    if day == 0 {
        return None;
    }
    let mut cursor = pos + day;

    cursor = skip_required_space(bytes, cursor)?;

    if count_while(bytes, cursor, 3, |b| b.is_ascii_alphabetic()) != 3 {
        return None;
    }
    cursor = skip_required_space(bytes, cursor + 3)?;

    if count_while(bytes, cursor, 4, |b| b.is_ascii_digit()) != 4 {
        return None;
    }
    cursor = skip_required_space(bytes, cursor + 4)?;

    let time = count_while(bytes, cursor, usize::MAX, is_time_byte);
    (time > 0).then_some(cursor + time)
}

/// `[D-]{10} WS+ [D:.]{8,}`, e.g. `2024-01-12 10:15:30.123`
fn match_numeric_date_timestamp(bytes: &[u8], pos: usize) -> Option<usize> {
    if count_while(bytes, pos, 10, |b| b.is_ascii_digit() || b == b'-') != 10 {
        return None;
    }
    let cursor = skip_required_space(bytes, pos + 10)?;

    let time = count_while(bytes, cursor, usize::MAX, is_time_byte);
    (time >= 8).then_some(cursor + time)
}

/// `WS* < D{4} >`; returns the offset of the first indicator digit
fn match_mti(bytes: &[u8], pos: usize) -> Option<usize> {
    let cursor = pos + count_while(bytes, pos, usize::MAX, is_space);
    if bytes.get(cursor) != Some(&b'<') {
        return None;
    }
    let digits = cursor + 1;
    if count_while(bytes, digits, 4, |b| b.is_ascii_digit()) != 4 {
        return None;
    }
    (bytes.get(digits + 4) == Some(&b'>')).then_some(digits)
}

fn skip_required_space(bytes: &[u8], pos: usize) -> Option<usize> {
    let spaces = count_while(bytes, pos, usize::MAX, is_space);
    (spaces > 0).then_some(pos + spaces)
}

fn is_time_byte(byte: u8) -> bool {
    byte.is_ascii_digit() || byte == b':' || byte == b'.'
}

/// Extract every tagged field from an entry body
///
/// The last occurrence of a duplicated tag wins.
pub fn parse_fields(body: &str) -> DataElements {
    let mut elements = DataElements::new();
    let mut pos = 0;

    while pos < body.len() {
        match match_field_at(body, pos) {
            Some(field) => {
                elements.insert(field.tag, field.value);
                pos = field.end;
            }
            None => pos += 1,
        }
    }

    elements
}

/// Try to recognize a tagged field starting exactly at `pos`
pub fn match_field_at(body: &str, pos: usize) -> Option<FieldMatch<'_>> {
    let bytes = body.as_bytes();

    if bytes[pos..].starts_with(FIELD_PREFIX.as_bytes()) {
        let after_prefix = pos + FIELD_PREFIX.len();
        if let Some(tag_start) = skip_required_space(bytes, after_prefix) {
            if let Some(field) = match_tagged_value(body, tag_start) {
                return Some(field);
            }
        }
    }

    match_tagged_value(body, pos)
}

/// `D{3} [: \t]+ "["? value "]"?`
fn match_tagged_value(body: &str, pos: usize) -> Option<FieldMatch<'_>> {
    let bytes = body.as_bytes();

    if count_while(bytes, pos, 3, |b| b.is_ascii_digit()) != 3 {
        return None;
    }
    let tag = &body[pos..pos + 3];
    let mut cursor = pos + 3;

    let separator = count_while(bytes, cursor, usize::MAX, |b| {
        b == b':' || (is_space(b) && b != b'\r' && b != b'\n')
    });
    if separator == 0 {
        return None;
    }
    cursor += separator;

    if bytes.get(cursor) == Some(&b'[') {
        cursor += 1;
    }

    let value_len = count_while(bytes, cursor, usize::MAX, |b| {
        b != b']' && b != b'\r' && b != b'\n'
    });
    if value_len == 0 {
        return None;
    }
    let value = body[cursor..cursor + value_len].trim();
    cursor += value_len;

    if bytes.get(cursor) == Some(&b']') {
        cursor += 1;
    }

    Some(FieldMatch {
        tag,
        value,
        end: cursor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;
    use rstest::rstest;

    #[rstest]
    #[case::bracketed_day_month("[12 Jan 2024 10:15:30.123] <0200>", "12 Jan 2024 10:15:30.123", Some("0200"))]
    #[case::bare_day_month("3 Feb 2024 08:00:00.000 <0810>", "3 Feb 2024 08:00:00.000", Some("0810"))]
    #[case::numeric_date("2024-01-12 10:15:30.123 <0210>", "2024-01-12 10:15:30.123", Some("0210"))]
    #[case::indicator_without_space("[2024-01-12 10:15:30.123]<0800>", "2024-01-12 10:15:30.123", Some("0800"))]
    #[case::no_indicator("[2024-01-12 10:15:30.123] body", "2024-01-12 10:15:30.123", None)]
    #[case::malformed_but_shaped("[99 Xyz 0000 ::::]", "99 Xyz 0000 ::::", None)]
    fn test_match_header_at(
        #[case] text: &str,
        #[case] timestamp: &str,
        #[case] mti: Option<&str>,
    ) {
        let header = match_header_at(text, 0).expect("header should match");
        assert_eq!(header.timestamp, timestamp);
        assert_eq!(header.mti, mti);
    }

    #[rstest]
    #[case::plain_words("hello world")]
    #[case::short_time("2024-01-12 10:15")]
    #[case::three_digit_day("123 Jan 2024 10:00:00")]
    #[case::bad_indicator_still_needs_timestamp("<0200>")]
    fn test_match_header_at_rejects(#[case] text: &str) {
        assert!(match_header_at(text, 0).is_none());
    }

    #[test]
    fn test_bad_indicator_leaves_header_without_mti() {
        let header = match_header_at("2024-01-12 10:15:30.123 <02x0>", 0).unwrap();
        assert_eq!(header.mti, None);
        assert_eq!(header.end, "2024-01-12 10:15:30.123".len());
    }

    #[test]
    fn test_scan_headers_finds_header_after_longer_digit_run() {
        let headers = scan_headers("x 123 Jan 2024 10:00:00.000 <0200>");
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0].timestamp, "23 Jan 2024 10:00:00.000");
    }

    #[rstest]
    #[case::field_prefix_bracketed("Field 002: [4111111111111111]", "002", "4111111111111111")]
    #[case::bare_bracketed("002 [4111111111111111]", "002", "4111111111111111")]
    #[case::colon_unbracketed("002: 4111111111111111", "002", "4111111111111111")]
    #[case::padded_value("Field 043: [  ATM BRANCH 01  ]", "043", "ATM BRANCH 01")]
    #[case::spaced_colon("039 : 00", "039", "00")]
    fn test_match_field_at(#[case] body: &str, #[case] tag: &str, #[case] value: &str) {
        let field = match_field_at(body, 0).expect("field should match");
        assert_eq!(field.tag, tag);
        assert_eq!(field.value, value);
    }

    #[test]
    fn test_parse_fields_multiline_body() {
        let body = "\nField 002: [4111111111111111]\nField 011: [123456]\n039: 00\r\n";
        let fields = parse_fields(body);

        assert_eq!(fields.get("002"), Some("4111111111111111"));
        assert_eq!(fields.get("011"), Some("123456"));
        assert_eq!(fields.get("039"), Some("00"));
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn test_parse_fields_duplicate_tag_last_wins() {
        let fields = parse_fields("011 [000001]\n011 [000002]\n");
        assert_eq!(fields.get("011"), Some("000002"));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_parse_fields_empty_value_does_not_swallow_next_line() {
        let fields = parse_fields("Field 039:\nField 041: [TERM0001]\n");
        assert_eq!(fields.get("039"), None);
        assert_eq!(fields.get("041"), Some("TERM0001"));
    }

    #[test]
    fn test_tokenize_splits_entries_and_bodies() {
        let raw = "[12 Jan 2024 10:15:30.123] <0200>\nField 011: [123456]\nField 004: [000000100000]\n\
                   [12 Jan 2024 10:15:31.000] <0210>\nField 011: [123456]\nField 039: [00]\n";
        let entries = FixedFieldTokenizer.tokenize(raw);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].direction, Direction::Request);
        assert_eq!(entries[0].mti(), Some("0200"));
        assert_eq!(entries[0].timestamp, "12 Jan 2024 10:15:30.123");
        assert_eq!(entries[0].data_element("004"), Some("000000100000"));
        assert!(entries[0].raw_body.contains("Field 011"));
        assert!(!entries[0].raw_body.contains("0210"));

        assert_eq!(entries[1].direction, Direction::Response);
        assert_eq!(entries[1].data_element("039"), Some("00"));
    }

    #[test]
    fn test_tokenize_missing_indicator_defaults_to_request() {
        let entries = FixedFieldTokenizer.tokenize("2024-01-12 10:15:30.123\n011 [000777]\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].mti(), Some(DEFAULT_MTI));
        assert_eq!(entries[0].direction, Direction::Request);
    }

    #[test]
    fn test_tokenize_discards_preamble() {
        let entries = FixedFieldTokenizer.tokenize("noise 011 [999999]\n2024-01-12 10:15:30.123 <0200>\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].data_element("011"), None);
    }

    #[rstest]
    #[case::empty("")]
    #[case::whitespace("  \n\t \r\n")]
    fn test_tokenize_blank_input_yields_nothing(#[case] raw: &str) {
        assert!(FixedFieldTokenizer.tokenize(raw).is_empty());
    }

    #[test]
    fn test_tokenize_headerless_input_yields_one_fallback_entry() {
        let raw = "orphan continuation\nField 011: [123456]\n";
        let entries = FixedFieldTokenizer.tokenize(raw);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].raw_body, raw);
        assert_eq!(entries[0].direction, Direction::Request);
        assert_eq!(entries[0].mti(), Some(DEFAULT_MTI));
        assert_eq!(entries[0].data_element("011"), Some("123456"));
        assert!(!entries[0].timestamp.is_empty());
    }

    #[test]
    fn test_tokenize_is_idempotent() {
        let raw = "[12 Jan 2024 10:15:30.123] <0200>\n011 [1]\n2024-01-12 10:15:31.000 <0210>\n011 [1]\n";
        assert_eq!(
            FixedFieldTokenizer.tokenize(raw),
            FixedFieldTokenizer.tokenize(raw)
        );
    }

    #[rstest]
    #[case::header_line("[12 Jan 2024 10:15:30.123] <0200>", true)]
    #[case::indented_header("   2024-01-12 10:15:30.123 <0210>", true)]
    #[case::field_line("Field 011: [123456]", false)]
    #[case::blank_line("", false)]
    fn test_starts_entry(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(FixedFieldTokenizer.starts_entry(line), expected);
    }
}
