//! Tokenizer module
//!
//! Splits raw text chunks into log entries, one tokenizer per channel.
//!
//! # Components
//!
//! - `fixed_field` - Header and tagged-field recognizers for the fixed-field channel
//! - `json` - Header-line recognizer and payload extraction for the JSON channel
//!
//! Both tokenizers are stateless: every call starts from scratch, so a chunk
//! tokenized twice yields equal entry sequences.

pub mod fixed_field;
pub mod json;

pub use fixed_field::FixedFieldTokenizer;
pub use json::JsonTokenizer;

use crate::types::{Channel, Entry};

/// Trait for turning raw log text into entries
pub trait Tokenizer {
    /// Channel the produced entries belong to
    fn channel(&self) -> Channel;

    /// Split a raw text chunk into entries, in order of appearance
    fn tokenize(&self, raw_text: &str) -> Vec<Entry>;

    /// Whether a line opens a new entry
    ///
    /// Chunk readers only cut chunks before such lines so that an entry is
    /// never split across two chunks.
    fn starts_entry(&self, line: &str) -> bool;
}

/// Whitespace as understood by the recognizers (ASCII plus vertical tab)
pub(crate) fn is_space(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == 0x0B
}

/// Count bytes matching `pred` starting at `pos`, up to `max`
pub(crate) fn count_while(bytes: &[u8], pos: usize, max: usize, pred: impl Fn(u8) -> bool) -> usize {
    bytes
        .iter()
        .skip(pos)
        .take(max)
        .take_while(|&&b| pred(b))
        .count()
}
