//! Rust Payments Reconciler CLI
//!
//! Command-line interface for reconciling payment switch logs.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --fixed-field switch.log > transactions.csv
//! cargo run -- --fixed-field switch.log --json api.log > transactions.csv
//! cargo run -- --strategy async --json api.log --format jsonl > transactions.jsonl
//! cargo run -- --fixed-field switch.log --chunk-lines 500 --max-pending 10000
//! ```
//!
//! The program reads each log chunk by chunk, pairs requests with responses
//! using the selected strategy, and writes the normalized transactions to
//! stdout. Logs go to stderr; set `RUST_LOG` to change verbosity.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (no input, file not found, file not readable, output failure)

use rust_payments_reconciler::cli;
use rust_payments_reconciler::strategy;
use std::process;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let args = cli::parse_args();
    let inputs = args.to_session_inputs();
    let strategy = strategy::create_strategy(args.strategy, args.to_session_config());

    let mut output = std::io::stdout().lock();
    if let Err(e) = strategy.process(&inputs, &mut output) {
        tracing::error!(error = %e, "reconciliation failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
