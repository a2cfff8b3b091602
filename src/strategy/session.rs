//! Session configuration and the pipeline shared by all strategies
//!
//! A session feeds each channel's log through its own reconciler, chunk by
//! chunk, collecting the pairs emitted by every incremental pass. Once both
//! channels reach end of input, the session is finalized in a fixed order:
//!
//! ```text
//! fixed-field drain ─► project ─► CrossChannelIndex
//!                                        │
//!                         json drain ◄───┘ ─► project
//! ```
//!
//! Output lists fixed-field transactions first, then JSON transactions, each
//! in emission order. Strategies only differ in how the ingestion half runs.

use crate::cli::OutputFormat;
use crate::core::{Reconciler, RetentionPolicy};
use crate::display::{project_all, CrossChannelIndex};
use crate::io::DEFAULT_CHUNK_LINES;
use crate::types::{Channel, NormalizedTransaction, ReconcileError, TransactionPair};
use std::path::PathBuf;
use tracing::{info, warn};

/// Log files of one session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionInputs {
    /// Fixed-field channel log
    pub fixed_field: Option<PathBuf>,

    /// JSON channel log
    pub json: Option<PathBuf>,
}

impl SessionInputs {
    /// Check that at least one channel has a log file
    pub fn validate(&self) -> Result<(), ReconcileError> {
        if self.fixed_field.is_none() && self.json.is_none() {
            return Err(ReconcileError::NoInput);
        }
        Ok(())
    }
}

/// Configuration for a reconciliation session
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Approximate number of lines per chunk
    pub chunk_lines: usize,

    /// Cap on each reconciler's pending buffer
    pub retention: RetentionPolicy,

    /// Worker threads of the async runtime
    pub worker_threads: usize,

    /// Output serialization format
    pub format: OutputFormat,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            chunk_lines: DEFAULT_CHUNK_LINES,
            retention: RetentionPolicy::unbounded(),
            worker_threads: num_cpus::get(),
            format: OutputFormat::Csv,
        }
    }
}

impl SessionConfig {
    /// Create a SessionConfig, replacing invalid values with defaults
    ///
    /// Zero `chunk_lines` or `worker_threads` fall back to the default with
    /// a warning.
    pub fn new(
        chunk_lines: usize,
        retention: RetentionPolicy,
        worker_threads: usize,
        format: OutputFormat,
    ) -> Self {
        let default = Self::default();

        let chunk_lines = if chunk_lines == 0 {
            warn!(
                chunk_lines,
                default = default.chunk_lines,
                "invalid chunk_lines, using default"
            );
            default.chunk_lines
        } else {
            chunk_lines
        };

        let worker_threads = if worker_threads == 0 {
            warn!(
                worker_threads,
                default = default.worker_threads,
                "invalid worker_threads, using default"
            );
            default.worker_threads
        } else {
            worker_threads
        };

        Self {
            chunk_lines,
            retention,
            worker_threads,
            format,
        }
    }
}

/// Counters for one channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelReport {
    /// Chunks fed to the reconciler
    pub chunks: usize,

    /// Entries tokenized across all chunks
    pub entries: usize,

    /// Pairs with both sides
    pub matched: usize,

    /// Pairs with one side missing
    pub orphans: usize,
}

/// Outcome of a completed session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionReport {
    pub fixed_field: ChannelReport,
    pub json: ChannelReport,

    /// Transactions written to the output
    pub transactions: usize,
}

/// Ingestion state of one channel
pub struct ChannelRun {
    /// Reconciler owning the channel's pending buffer
    pub reconciler: Box<dyn Reconciler + Send>,

    /// Pairs emitted so far, in emission order
    pub pairs: Vec<TransactionPair>,

    /// Chunk and entry counters
    pub report: ChannelReport,
}

impl ChannelRun {
    pub fn new(reconciler: Box<dyn Reconciler + Send>) -> Self {
        Self {
            reconciler,
            pairs: Vec::new(),
            report: ChannelReport::default(),
        }
    }

    pub fn channel(&self) -> Channel {
        self.reconciler.channel()
    }

    /// Feed one chunk and collect the pairs it completes
    pub fn feed(&mut self, chunk: &str) {
        let summary = self.reconciler.process_chunk(chunk);
        self.report.chunks += 1;
        self.report.entries += summary.new_entry_count;
        self.pairs.extend(self.reconciler.pair_incremental());
    }

    /// Drain the reconciler and project every pair
    fn finish(mut self, context: Option<&CrossChannelIndex>) -> (Vec<NormalizedTransaction>, ChannelReport) {
        self.pairs.extend(self.reconciler.drain_all(context));

        let orphans = self.pairs.iter().filter(|p| p.is_orphan()).count();
        self.report.orphans = orphans;
        self.report.matched = self.pairs.len() - orphans;

        (project_all(&self.pairs), self.report)
    }
}

/// Drain both channels in order and project every pair
///
/// The fixed-field channel is drained first; its transactions form the
/// cross-channel index handed to the JSON drain.
pub fn finalize_session(
    fixed_field: Option<ChannelRun>,
    json: Option<ChannelRun>,
) -> (Vec<NormalizedTransaction>, SessionReport) {
    let mut report = SessionReport::default();
    let mut transactions = Vec::new();

    if let Some(run) = fixed_field {
        let (projected, channel_report) = run.finish(None);
        report.fixed_field = channel_report;
        transactions = projected;
    }

    if let Some(run) = json {
        let index = CrossChannelIndex::from_transactions(&transactions);
        let (projected, channel_report) = run.finish(Some(&index));
        report.json = channel_report;
        transactions.extend(projected);
    }

    report.transactions = transactions.len();

    info!(
        fixed_field_entries = report.fixed_field.entries,
        fixed_field_matched = report.fixed_field.matched,
        fixed_field_orphans = report.fixed_field.orphans,
        json_entries = report.json.entries,
        json_matched = report.json.matched,
        json_orphans = report.json.orphans,
        transactions = report.transactions,
        "session complete"
    );

    (transactions, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FixedFieldReconciler, JsonReconciler};
    use crate::types::TransactionStatus;
    use rstest::rstest;

    #[test]
    fn test_inputs_require_a_channel() {
        assert_eq!(SessionInputs::default().validate(), Err(ReconcileError::NoInput));

        let inputs = SessionInputs {
            json: Some(PathBuf::from("json.log")),
            ..SessionInputs::default()
        };
        assert!(inputs.validate().is_ok());
    }

    #[rstest]
    #[case::valid(50, 4, 50, 4)]
    #[case::zero_chunk_lines(0, 4, DEFAULT_CHUNK_LINES, 4)]
    #[case::zero_workers(50, 0, 50, num_cpus::get())]
    fn test_session_config_fallbacks(
        #[case] chunk_lines: usize,
        #[case] workers: usize,
        #[case] expected_chunk_lines: usize,
        #[case] expected_workers: usize,
    ) {
        let config = SessionConfig::new(chunk_lines, RetentionPolicy::capped(10), workers, OutputFormat::Jsonl);

        assert_eq!(config.chunk_lines, expected_chunk_lines);
        assert_eq!(config.worker_threads, expected_workers);
        assert_eq!(config.retention, RetentionPolicy::capped(10));
        assert_eq!(config.format, OutputFormat::Jsonl);
    }

    #[test]
    fn test_finalize_orders_fixed_field_before_json() {
        let mut fixed = ChannelRun::new(Box::new(FixedFieldReconciler::new()));
        fixed.feed("[12 Jan 2024 10:00:00.000] <0200>\nField 011: [1]\nField 037: [R1]\n");
        fixed.feed("[12 Jan 2024 10:00:01.000] <0210>\nField 011: [1]\nField 039: [00]\n");

        let mut json = ChannelRun::new(Box::new(JsonReconciler::new()));
        json.feed("2024-01-12 10:00:00.000 REQ {\"referenceNumber\":\"R1\",\"pcode\":\"401000\"}\n");

        let (transactions, report) = finalize_session(Some(fixed), Some(json));

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].source, Channel::FixedField);
        assert_eq!(transactions[0].status, TransactionStatus::Success);
        assert_eq!(transactions[1].source, Channel::Json);
        assert_eq!(transactions[1].status, TransactionStatus::Timeout);
        assert_eq!(report.fixed_field.chunks, 2);
        assert_eq!(report.fixed_field.entries, 2);
        assert_eq!(report.fixed_field.matched, 1);
        assert_eq!(report.json.orphans, 1);
        assert_eq!(report.transactions, 2);
    }

    #[test]
    fn test_finalize_without_inputs_is_empty() {
        let (transactions, report) = finalize_session(None, None);

        assert!(transactions.is_empty());
        assert_eq!(report, SessionReport::default());
    }
}
