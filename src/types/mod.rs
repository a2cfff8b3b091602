//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `entry`: Parsed log entries and their channel-specific fields
//! - `pair`: Reconciled request/response pairs
//! - `transaction`: Normalized display projection of a pair
//! - `error`: Error types for reconciliation sessions

pub mod entry;
pub mod error;
pub mod pair;
pub mod transaction;

pub use entry::{Channel, DataElements, Direction, Entry, EntryFields, JsonPayload, DEFAULT_MTI};
pub use error::ReconcileError;
pub use pair::{ChunkSummary, TransactionPair};
pub use transaction::{NormalizedTransaction, TransactionStatus, APPROVED_RESPONSE_CODE};
