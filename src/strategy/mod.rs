//! Processing strategy module for reconciliation sessions
//!
//! This module defines the Strategy pattern for complete reconciliation
//! pipelines, from reading log files to writing normalized transactions.
//! This allows different ingestion implementations (synchronous, asynchronous
//! per-channel tasks) to be selected at runtime.

use crate::cli::StrategyType;
use crate::types::ReconcileError;
use std::io::Write;

pub mod r#async;
pub mod session;
pub mod sync;

pub use self::r#async::AsyncProcessingStrategy;
pub use session::{
    finalize_session, ChannelReport, ChannelRun, SessionConfig, SessionInputs, SessionReport,
};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete reconciliation sessions
///
/// Each strategy reads the session's log files chunk by chunk, drives one
/// reconciler per channel, and writes every resulting transaction to output.
pub trait ProcessingStrategy: Send + Sync {
    /// Reconcile the given logs and write the transactions to output
    ///
    /// # Arguments
    ///
    /// * `inputs` - Log file of each channel (at least one required)
    /// * `output` - Writer receiving the serialized transactions
    ///
    /// # Returns
    ///
    /// * `Ok(SessionReport)` with per-channel counters
    /// * `Err(ReconcileError)` if a fatal error occurred
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Neither channel has a log file
    /// - A log file cannot be opened or read
    /// - Output cannot be written
    ///
    /// Malformed log content is never an error: it degrades to parse-error
    /// markers and orphan pairs.
    fn process(
        &self,
        inputs: &SessionInputs,
        output: &mut dyn Write,
    ) -> Result<SessionReport, ReconcileError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `config` - Session configuration shared by both strategies
///
/// # Returns
///
/// A boxed trait object implementing the ProcessingStrategy trait
pub fn create_strategy(
    strategy_type: StrategyType,
    config: SessionConfig,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(config)),
        StrategyType::Async => Box::new(AsyncProcessingStrategy::new(config)),
    }
}
