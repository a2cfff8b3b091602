//! Log entry types for the Rust Payments Reconciler
//!
//! This module defines the parsed log record shared by both switch channels,
//! together with the channel-specific field containers.

use serde::Serialize;
use serde_json::Value;

/// Message-type indicator assumed when a fixed-field header carries none
pub const DEFAULT_MTI: &str = "0000";

/// Direction of a logged message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Message sent towards the switch
    Request,

    /// Message answered by the switch
    Response,
}

impl Direction {
    /// Derive the direction from a 4-digit message-type indicator
    ///
    /// The third digit is the message function: even values are requests,
    /// odd values are responses. A missing or non-digit third character is
    /// treated as `0`.
    pub fn from_mti(mti: &str) -> Self {
        let function = mti
            .as_bytes()
            .get(2)
            .filter(|b| b.is_ascii_digit())
            .map(|b| b - b'0')
            .unwrap_or(0);

        if function % 2 == 0 {
            Direction::Request
        } else {
            Direction::Response
        }
    }

    /// Derive the direction from a JSON channel `REQ`/`RSP` marker
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "REQ" => Some(Direction::Request),
            "RSP" => Some(Direction::Response),
            _ => None,
        }
    }
}

/// Log channel an entry was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Channel {
    /// Record-oriented, field-tagged message protocol
    #[serde(rename = "ISO8583")]
    FixedField,

    /// JSON request/response channel
    #[serde(rename = "JSON")]
    Json,
}

/// Tagged field values of a fixed-field entry
///
/// Keeps the order in which tags were first seen. Inserting a tag that is
/// already present overwrites its value in place, so the last occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataElements {
    elements: Vec<(String, String)>,
}

impl DataElements {
    /// Create an empty field set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a field value
    pub fn insert(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        let tag = tag.into();
        let value = value.into();

        match self.elements.iter_mut().find(|(t, _)| *t == tag) {
            Some(slot) => slot.1 = value,
            None => self.elements.push((tag, value)),
        }
    }

    /// Look up a field value by its 3-digit tag
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.elements
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, v)| v.as_str())
    }

    /// Number of distinct tags
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate over `(tag, value)` pairs in parse order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.elements.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DataElements {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut elements = DataElements::new();
        for (tag, value) in iter {
            elements.insert(tag, value);
        }
        elements
    }
}

/// Payload of a JSON channel entry
#[derive(Debug, Clone, PartialEq)]
pub enum JsonPayload {
    /// Successfully parsed payload (an empty object when the body had none)
    Parsed(Value),

    /// The `{ ... }` span of the body was not valid JSON
    ParseError {
        /// Message reported by the JSON parser
        message: String,
    },
}

impl JsonPayload {
    /// Parsed value, if the payload was valid JSON
    pub fn value(&self) -> Option<&Value> {
        match self {
            JsonPayload::Parsed(value) => Some(value),
            JsonPayload::ParseError { .. } => None,
        }
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self, JsonPayload::ParseError { .. })
    }
}

/// Channel-specific content of an entry
#[derive(Debug, Clone, PartialEq)]
pub enum EntryFields {
    /// Fixed-field message: its message-type indicator and tagged fields
    Tagged {
        /// 4-digit message-type indicator (`"0000"` when absent from the header)
        mti: String,
        /// Tagged field values
        elements: DataElements,
    },

    /// JSON message payload
    Json(JsonPayload),
}

/// One parsed log record
///
/// Every entry belongs to exactly one channel (given by its `fields` variant)
/// and one direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Header timestamp, kept as written (format differs per channel)
    pub timestamp: String,

    /// Request or response
    pub direction: Direction,

    /// Unparsed text belonging to this entry
    pub raw_body: String,

    /// Parsed content
    pub fields: EntryFields,
}

impl Entry {
    /// Create a fixed-field entry; direction follows the indicator
    pub fn fixed_field(
        timestamp: impl Into<String>,
        mti: impl Into<String>,
        raw_body: impl Into<String>,
        elements: DataElements,
    ) -> Self {
        let mti = mti.into();
        Entry {
            timestamp: timestamp.into(),
            direction: Direction::from_mti(&mti),
            raw_body: raw_body.into(),
            fields: EntryFields::Tagged { mti, elements },
        }
    }

    /// Create a JSON channel entry
    pub fn json(
        timestamp: impl Into<String>,
        direction: Direction,
        raw_body: impl Into<String>,
        payload: JsonPayload,
    ) -> Self {
        Entry {
            timestamp: timestamp.into(),
            direction,
            raw_body: raw_body.into(),
            fields: EntryFields::Json(payload),
        }
    }

    pub fn channel(&self) -> Channel {
        match self.fields {
            EntryFields::Tagged { .. } => Channel::FixedField,
            EntryFields::Json(_) => Channel::Json,
        }
    }

    pub fn is_request(&self) -> bool {
        self.direction == Direction::Request
    }

    /// Message-type indicator of a fixed-field entry
    pub fn mti(&self) -> Option<&str> {
        match &self.fields {
            EntryFields::Tagged { mti, .. } => Some(mti),
            EntryFields::Json(_) => None,
        }
    }

    /// Tagged field value of a fixed-field entry
    pub fn data_element(&self, tag: &str) -> Option<&str> {
        match &self.fields {
            EntryFields::Tagged { elements, .. } => elements.get(tag),
            EntryFields::Json(_) => None,
        }
    }

    /// JSON payload of a JSON channel entry
    pub fn payload(&self) -> Option<&JsonPayload> {
        match &self.fields {
            EntryFields::Json(payload) => Some(payload),
            EntryFields::Tagged { .. } => None,
        }
    }

    /// Parsed JSON value, absent for fixed-field entries and parse errors
    pub fn json_value(&self) -> Option<&Value> {
        self.payload().and_then(JsonPayload::value)
    }
}
