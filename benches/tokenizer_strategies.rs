//! Benchmark suite for tokenizers, reconcilers and processing strategies
//!
//! Uses the divan benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```
//!
//! # Benchmark Inputs
//!
//! Logs are generated in memory with a given number of request/response
//! pairs, responses trailing their requests by a few entries so that every
//! incremental pass has pending work. Strategy benchmarks write the same
//! logs to temporary files.

use rust_payments_reconciler::cli::StrategyType;
use rust_payments_reconciler::core::{FixedFieldReconciler, JsonReconciler, Reconciler};
use rust_payments_reconciler::io::ChunkBuilder;
use rust_payments_reconciler::strategy::{create_strategy, SessionConfig, SessionInputs};
use rust_payments_reconciler::tokenizer::{FixedFieldTokenizer, JsonTokenizer, Tokenizer};
use std::io::Write;
use tempfile::NamedTempFile;

fn main() {
    divan::main();
}

const SIZES: &[usize] = &[100, 1_000, 10_000];

/// Distance, in entries, between a request and its response
const LAG: usize = 8;

fn fixed_field_log(pairs: usize) -> String {
    let mut log = String::new();
    for i in 0..pairs + LAG {
        if i < pairs {
            log.push_str(&format!(
                "[12 Jan 2024 10:00:00.000] <0200>\nField 003: [401000]\nField 004: [000000100000]\n\
                 Field 011: [{:06}]\nField 037: [{:012}]\n",
                i, i
            ));
        }
        if i >= LAG {
            log.push_str(&format!(
                "[12 Jan 2024 10:00:01.000] <0210>\nField 011: [{:06}]\nField 039: [00]\n",
                i - LAG
            ));
        }
    }
    log
}

fn json_log(pairs: usize) -> String {
    let mut log = String::new();
    for i in 0..pairs + LAG {
        if i < pairs {
            log.push_str(&format!(
                "2024-01-12 10:00:00.000 REQ {{\"mti\":\"0200\",\"traceNumber\":\"{:06}\",\
                 \"pcode\":\"401000\",\"referenceNumber\":\"{:012}\"}}\n",
                i, i
            ));
        }
        if i >= LAG {
            log.push_str(&format!(
                "2024-01-12 10:00:01.000 RSP {{\"data\":{{\"referenceNumber\":\"{:012}\"}},\
                 \"responseStatus\":\"00\"}}\n",
                i - LAG
            ));
        }
    }
    log
}

/// Split a log into one chunk per entry
fn entry_chunks<T: Tokenizer>(tokenizer: T, log: &str) -> Vec<String> {
    let mut builder = ChunkBuilder::new(tokenizer, 1);
    let mut chunks: Vec<String> = log
        .split_inclusive('\n')
        .filter_map(|line| builder.push_line(line))
        .collect();
    chunks.extend(builder.finish());
    chunks
}

fn temp_log(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp file");
    file.flush().expect("Failed to flush temp file");
    file
}

#[divan::bench(args = SIZES)]
fn fixed_field_tokenize(bencher: divan::Bencher, pairs: usize) {
    let log = fixed_field_log(pairs);
    bencher.bench(|| FixedFieldTokenizer.tokenize(divan::black_box(&log)));
}

#[divan::bench(args = SIZES)]
fn json_tokenize(bencher: divan::Bencher, pairs: usize) {
    let log = json_log(pairs);
    bencher.bench(|| JsonTokenizer.tokenize(divan::black_box(&log)));
}

/// Feed the fixed-field log one entry at a time, pairing after each
#[divan::bench(args = SIZES)]
fn fixed_field_incremental(bencher: divan::Bencher, pairs: usize) {
    let chunks = entry_chunks(FixedFieldTokenizer, &fixed_field_log(pairs));

    bencher.bench(|| {
        let mut reconciler = FixedFieldReconciler::new();
        let mut emitted = 0;
        for chunk in &chunks {
            reconciler.process_chunk(chunk);
            emitted += reconciler.pair_incremental().len();
        }
        emitted + reconciler.drain_all(None).len()
    });
}

/// Feed the JSON log one entry at a time, pairing after each
#[divan::bench(args = SIZES)]
fn json_incremental(bencher: divan::Bencher, pairs: usize) {
    let chunks = entry_chunks(JsonTokenizer, &json_log(pairs));

    bencher.bench(|| {
        let mut reconciler = JsonReconciler::new();
        let mut emitted = 0;
        for chunk in &chunks {
            reconciler.process_chunk(chunk);
            emitted += reconciler.pair_incremental().len();
        }
        emitted + reconciler.drain_all(None).len()
    });
}

#[divan::bench(args = ["sync", "async"])]
fn session_strategy(bencher: divan::Bencher, strategy: &str) {
    let strategy_type = match strategy {
        "async" => StrategyType::Async,
        _ => StrategyType::Sync,
    };
    let fixed = temp_log(&fixed_field_log(1_000));
    let json = temp_log(&json_log(1_000));
    let inputs = SessionInputs {
        fixed_field: Some(fixed.path().to_path_buf()),
        json: Some(json.path().to_path_buf()),
    };
    let session = create_strategy(strategy_type, SessionConfig::default());

    bencher.bench(|| {
        let mut output = Vec::new();
        session
            .process(&inputs, &mut output)
            .expect("Processing failed");
        output
    });
}
