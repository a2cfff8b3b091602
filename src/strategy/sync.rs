//! Synchronous processing strategy
//!
//! This module provides a single-threaded implementation of the
//! ProcessingStrategy trait. Channels are ingested one after the other on
//! the calling thread.
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - Chunked reading to `SyncChunkReader` (iterator interface)
//! - Pairing to the channel reconcilers
//! - Finalization and projection to `finalize_session`
//! - Output to `io::output::write_transactions`
//!
//! # Memory Efficiency
//!
//! Log files are streamed chunk by chunk; only unmatched entries and the
//! emitted pairs are held in memory.

use crate::core::{FixedFieldReconciler, JsonReconciler, Reconciler};
use crate::io::output::write_transactions;
use crate::io::sync_reader::SyncChunkReader;
use crate::strategy::session::{finalize_session, ChannelRun, SessionConfig, SessionInputs, SessionReport};
use crate::strategy::ProcessingStrategy;
use crate::tokenizer::{FixedFieldTokenizer, JsonTokenizer, Tokenizer};
use crate::types::ReconcileError;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use rust_payments_reconciler::strategy::{ProcessingStrategy, SessionConfig, SessionInputs, SyncProcessingStrategy};
/// use std::path::PathBuf;
///
/// let strategy = SyncProcessingStrategy::new(SessionConfig::default());
/// let inputs = SessionInputs {
///     fixed_field: Some(PathBuf::from("switch.log")),
///     json: None,
/// };
///
/// strategy.process(&inputs, &mut std::io::stdout()).expect("Processing failed");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SyncProcessingStrategy {
    config: SessionConfig,
}

impl SyncProcessingStrategy {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    /// Stream one log file through a reconciler
    fn ingest<T: Tokenizer>(
        &self,
        path: &Path,
        tokenizer: T,
        reconciler: Box<dyn Reconciler + Send>,
    ) -> Result<ChannelRun, ReconcileError> {
        let mut run = ChannelRun::new(reconciler);
        let reader = SyncChunkReader::open(path, tokenizer, self.config.chunk_lines)?;

        for chunk in reader {
            run.feed(&chunk?);
        }

        debug!(
            channel = ?run.channel(),
            path = %path.display(),
            chunks = run.report.chunks,
            "log ingested"
        );
        Ok(run)
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Reconcile the session's logs and write the transactions to output
    ///
    /// # Returns
    ///
    /// * `Ok(SessionReport)` if the session completed
    /// * `Err(ReconcileError)` if no input was given, a log could not be
    ///   read, or output could not be written
    fn process(
        &self,
        inputs: &SessionInputs,
        output: &mut dyn Write,
    ) -> Result<SessionReport, ReconcileError> {
        inputs.validate()?;
        let retention = self.config.retention;

        let fixed_field = inputs
            .fixed_field
            .as_deref()
            .map(|path| {
                self.ingest(
                    path,
                    FixedFieldTokenizer,
                    Box::new(FixedFieldReconciler::with_retention(retention)),
                )
            })
            .transpose()?;

        let json = inputs
            .json
            .as_deref()
            .map(|path| {
                self.ingest(
                    path,
                    JsonTokenizer,
                    Box::new(JsonReconciler::with_retention(retention)),
                )
            })
            .transpose()?;

        let (transactions, report) = finalize_session(fixed_field, json);
        write_transactions(self.config.format, &transactions, output)?;

        Ok(report)
    }
}
