use crate::core::RetentionPolicy;
use crate::strategy::{SessionConfig, SessionInputs};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Reconcile payment switch request/response logs into normalized transactions
#[derive(Parser, Debug)]
#[command(name = "payments-reconciler")]
#[command(
    about = "Reconcile payment switch request/response logs into normalized transactions",
    long_about = None
)]
pub struct CliArgs {
    /// Fixed-field channel log file
    #[arg(
        long = "fixed-field",
        value_name = "PATH",
        help = "Path to the fixed-field (ISO 8583 style) log file"
    )]
    pub fixed_field: Option<PathBuf>,

    /// JSON channel log file
    #[arg(long = "json", value_name = "PATH", help = "Path to the JSON channel log file")]
    pub json: Option<PathBuf>,

    /// Ingestion strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Ingestion strategy: 'sync' reads channels in sequence, 'async' reads them concurrently"
    )]
    pub strategy: StrategyType,

    /// Approximate number of lines per chunk
    #[arg(
        long = "chunk-lines",
        value_name = "LINES",
        help = "Approximate lines per chunk; chunks are cut at entry boundaries (default: 200)"
    )]
    pub chunk_lines: Option<usize>,

    /// Cap on unmatched entries per reconciler
    #[arg(
        long = "max-pending",
        value_name = "COUNT",
        help = "Evict the oldest unmatched entries beyond this count per direction (default: unbounded)"
    )]
    pub max_pending: Option<usize>,

    /// Worker threads of the async runtime
    #[arg(
        long = "worker-threads",
        value_name = "COUNT",
        help = "Worker threads for the async strategy (default: CPU cores)"
    )]
    pub worker_threads: Option<usize>,

    /// Output format
    #[arg(
        long = "format",
        value_name = "FORMAT",
        default_value = "csv",
        help = "Output format: 'csv' or 'jsonl' (JSON lines, includes raw entry text)"
    )]
    pub format: OutputFormat,
}

/// Available ingestion strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Available output formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Jsonl,
}

impl CliArgs {
    /// Log files named on the command line
    pub fn to_session_inputs(&self) -> SessionInputs {
        SessionInputs {
            fixed_field: self.fixed_field.clone(),
            json: self.json.clone(),
        }
    }

    /// Create a SessionConfig from CLI arguments
    ///
    /// Values not given on the command line take their defaults. Invalid
    /// values fall back to defaults with a warning.
    pub fn to_session_config(&self) -> SessionConfig {
        let default = SessionConfig::default();
        let retention = self
            .max_pending
            .map_or_else(RetentionPolicy::unbounded, RetentionPolicy::capped);

        SessionConfig::new(
            self.chunk_lines.unwrap_or(default.chunk_lines),
            retention,
            self.worker_threads.unwrap_or(default.worker_threads),
            self.format,
        )
    }
}
