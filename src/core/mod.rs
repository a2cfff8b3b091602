//! Core reconciliation module
//!
//! This module contains the stateful request/response pairing components:
//! - `traits` - Reconciler abstraction shared by both channels
//! - `fixed_field` - Trace-number pairing for the fixed-field channel
//! - `json` - Two-phase pairing for the JSON channel
//! - `match_keys` - Ordered key-extraction strategies
//! - `retention` - Count-based cap on pending buffers

pub mod fixed_field;
pub mod json;
pub mod match_keys;
pub mod retention;
pub mod traits;

pub use fixed_field::FixedFieldReconciler;
pub use json::{match_anonymous, match_entries, match_identified, JsonReconciler, MatchOutcome};
pub use retention::RetentionPolicy;
pub use traits::Reconciler;
