//! Display projection module
//!
//! Turns reconciled pairs into channel-independent [`NormalizedTransaction`]s.
//! Projections are pure and stateless; they run per pair when output is
//! produced and nothing is cached on the reconcilers.
//!
//! - `fixed_field` - Projection of fixed-field pairs
//! - `json` - Projection of JSON pairs
//! - `cross_channel` - Index of finalized fixed-field transactions

pub mod cross_channel;
pub mod fixed_field;
pub mod json;

pub use cross_channel::CrossChannelIndex;
pub use fixed_field::{parse_minor_amount, project_fixed_field};
pub use json::{json_text, project_json};

use crate::types::{Channel, NormalizedTransaction, TransactionPair};

/// Project a pair with the mapper for its channel
pub fn project(pair: &TransactionPair) -> NormalizedTransaction {
    match pair.channel() {
        Channel::FixedField => project_fixed_field(pair),
        Channel::Json => project_json(pair),
    }
}

/// Project every pair, preserving order
pub fn project_all(pairs: &[TransactionPair]) -> Vec<NormalizedTransaction> {
    pairs.iter().map(project).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataElements, Direction, Entry, JsonPayload};
    use serde_json::json;

    #[test]
    fn test_project_dispatches_on_channel() {
        let fixed = TransactionPair::RequestOnly(Entry::fixed_field(
            "12 Jan 2024 10:00:00.000",
            "0200",
            "",
            [("011", "1")].into_iter().collect::<DataElements>(),
        ));
        let json = TransactionPair::RequestOnly(Entry::json(
            "2024-01-12 10:00:00.000",
            Direction::Request,
            "",
            JsonPayload::Parsed(json!({"traceNumber": "2"})),
        ));

        let projected = project_all(&[fixed, json]);

        assert_eq!(projected[0].source, Channel::FixedField);
        assert_eq!(projected[0].trace_number.as_deref(), Some("1"));
        assert_eq!(projected[1].source, Channel::Json);
        assert_eq!(projected[1].trace_number.as_deref(), Some("2"));
    }
}
