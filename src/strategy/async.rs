//! Asynchronous processing strategy
//!
//! This module provides a multi-threaded implementation of the
//! ProcessingStrategy trait. Each channel is ingested by its own tokio task
//! that owns that channel's reconciler, so the two logs are read and paired
//! concurrently without sharing any buffer.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── tokio multi-thread runtime (worker_threads)
//!     ├── task: AsyncChunkReader ─► FixedFieldReconciler
//!     ├── task: AsyncChunkReader ─► JsonReconciler
//!     └── join_all ─► finalize_session ─► write_transactions
//! ```
//!
//! Finalization runs after both tasks complete, in the same order as the
//! sync strategy, so both strategies produce identical output.

use crate::core::{FixedFieldReconciler, JsonReconciler, Reconciler};
use crate::io::async_reader::AsyncChunkReader;
use crate::io::output::write_transactions;
use crate::strategy::session::{finalize_session, ChannelRun, SessionConfig, SessionInputs, SessionReport};
use crate::strategy::ProcessingStrategy;
use crate::tokenizer::{FixedFieldTokenizer, JsonTokenizer, Tokenizer};
use crate::types::{Channel, ReconcileError};
use futures::future::join_all;
use std::io::Write;
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tracing::debug;

/// Stream one log file through a reconciler inside a task
async fn ingest<T: Tokenizer>(
    path: PathBuf,
    tokenizer: T,
    reconciler: Box<dyn Reconciler + Send>,
    chunk_lines: usize,
) -> Result<ChannelRun, ReconcileError> {
    let mut run = ChannelRun::new(reconciler);
    let mut reader = AsyncChunkReader::open(&path, tokenizer, chunk_lines).await?;

    while let Some(chunk) = reader.next_chunk().await? {
        run.feed(&chunk);
    }

    debug!(
        channel = ?run.channel(),
        path = %path.display(),
        chunks = run.report.chunks,
        "log ingested"
    );
    Ok(run)
}

/// Asynchronous processing strategy
///
/// # Configuration
///
/// Uses `worker_threads` from the SessionConfig for the runtime; every
/// other setting behaves as in the sync strategy.
#[derive(Debug, Clone, Default)]
pub struct AsyncProcessingStrategy {
    config: SessionConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Reconcile the session's logs concurrently and write the transactions
    ///
    /// # Error Handling
    ///
    /// The first failing channel's error is returned. A panicked or
    /// cancelled task surfaces as `ReconcileError::RuntimeError`.
    fn process(
        &self,
        inputs: &SessionInputs,
        output: &mut dyn Write,
    ) -> Result<SessionReport, ReconcileError> {
        inputs.validate()?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.worker_threads)
            .build()
            .map_err(ReconcileError::runtime)?;

        let retention = self.config.retention;
        let chunk_lines = self.config.chunk_lines;

        let runs = runtime.block_on(async {
            let mut tasks: Vec<JoinHandle<Result<ChannelRun, ReconcileError>>> = Vec::new();

            if let Some(path) = inputs.fixed_field.clone() {
                tasks.push(tokio::spawn(ingest(
                    path,
                    FixedFieldTokenizer,
                    Box::new(FixedFieldReconciler::with_retention(retention)),
                    chunk_lines,
                )));
            }

            if let Some(path) = inputs.json.clone() {
                tasks.push(tokio::spawn(ingest(
                    path,
                    JsonTokenizer,
                    Box::new(JsonReconciler::with_retention(retention)),
                    chunk_lines,
                )));
            }

            join_all(tasks).await
        });

        let mut fixed_field = None;
        let mut json = None;

        for joined in runs {
            let run = joined.map_err(ReconcileError::runtime)??;
            match run.channel() {
                Channel::FixedField => fixed_field = Some(run),
                Channel::Json => json = Some(run),
            }
        }

        let (transactions, report) = finalize_session(fixed_field, json);
        write_transactions(self.config.format, &transactions, output)?;

        Ok(report)
    }
}
