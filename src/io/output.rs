//! Output handling for normalized transactions
//!
//! This module centralizes all output format concerns:
//! - `TransactionRow` flat record for CSV output
//! - CSV serialization through the `csv` crate
//! - JSON lines serialization through `serde_json`
//!
//! CSV rows leave out the raw entry text, which is multi-line; the JSON
//! lines format carries every field.

use crate::cli::OutputFormat;
use crate::types::{Channel, NormalizedTransaction, ReconcileError, TransactionStatus};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

/// One CSV output row
#[derive(Debug, Serialize, PartialEq)]
pub struct TransactionRow<'a> {
    pub source: Channel,
    pub timestamp: Option<&'a str>,
    pub reference_number: Option<&'a str>,
    pub trace_number: Option<&'a str>,
    pub serial_number: Option<&'a str>,
    pub pcode: Option<&'a str>,
    pub amount: Option<Decimal>,
    pub response_code: Option<&'a str>,
    pub response_message: Option<&'a str>,
    pub terminal_id: Option<&'a str>,
    pub status: TransactionStatus,
}

impl<'a> From<&'a NormalizedTransaction> for TransactionRow<'a> {
    fn from(tx: &'a NormalizedTransaction) -> Self {
        TransactionRow {
            source: tx.source,
            timestamp: tx.timestamp.as_deref(),
            reference_number: tx.reference_number.as_deref(),
            trace_number: tx.trace_number.as_deref(),
            serial_number: tx.serial_number.as_deref(),
            pcode: tx.pcode.as_deref(),
            amount: tx.amount,
            response_code: tx.response_code.as_deref(),
            response_message: tx.response_message.as_deref(),
            terminal_id: tx.terminal_id.as_deref(),
            status: tx.status,
        }
    }
}

/// Write transactions as CSV with a header row
///
/// # Arguments
///
/// * `transactions` - Transactions to write, in output order
/// * `output` - Writer receiving the CSV text
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(ReconcileError::OutputError)` if serialization or flushing failed
pub fn write_transactions_csv(
    transactions: &[NormalizedTransaction],
    output: &mut dyn Write,
) -> Result<(), ReconcileError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(output);

    for tx in transactions {
        writer.serialize(TransactionRow::from(tx))?;
    }

    writer
        .flush()
        .map_err(|e| ReconcileError::output("csv", e))?;
    Ok(())
}

/// Write transactions as JSON lines, one object per transaction
pub fn write_transactions_jsonl(
    transactions: &[NormalizedTransaction],
    output: &mut dyn Write,
) -> Result<(), ReconcileError> {
    for tx in transactions {
        serde_json::to_writer(&mut *output, tx)?;
        output
            .write_all(b"\n")
            .map_err(|e| ReconcileError::output("jsonl", e))?;
    }

    output
        .flush()
        .map_err(|e| ReconcileError::output("jsonl", e))?;
    Ok(())
}

/// Write transactions in the requested format
pub fn write_transactions(
    format: OutputFormat,
    transactions: &[NormalizedTransaction],
    output: &mut dyn Write,
) -> Result<(), ReconcileError> {
    match format {
        OutputFormat::Csv => write_transactions_csv(transactions, output),
        OutputFormat::Jsonl => write_transactions_jsonl(transactions, output),
    }
}
