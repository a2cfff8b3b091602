//! End-to-end integration tests
//!
//! These tests validate the complete reconciliation pipeline using predefined
//! log fixtures. Each test:
//! 1. Reads fixed_field.log and/or json.log from a fixture directory
//! 2. Reconciles both channels through the selected strategy
//! 3. Writes the normalized transactions as CSV
//! 4. Compares actual output with expected.csv
//!
//! Test fixtures are located in tests/fixtures/ and cover:
//! - Trace-number pairing on the fixed-field channel
//! - Orphan requests and responses, preamble text, missing response codes
//! - Identified and greedy-fallback matching on the JSON channel
//! - Sessions carrying both channels
//!
//! Each test is run twice: once with the sync strategy and once with the async strategy.

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rust_payments_reconciler::cli::{OutputFormat, StrategyType};
    use rust_payments_reconciler::core::RetentionPolicy;
    use rust_payments_reconciler::strategy::{create_strategy, SessionConfig, SessionInputs};
    use rust_payments_reconciler::types::ReconcileError;
    use std::fs;
    use std::io::Write;
    use std::path::{Path, PathBuf};
    use tempfile::NamedTempFile;

    /// Log files present in a fixture directory
    fn fixture_inputs(fixture_dir: &Path) -> SessionInputs {
        let existing = |name: &str| {
            let path = fixture_dir.join(name);
            path.exists().then_some(path)
        };

        SessionInputs {
            fixed_field: existing("fixed_field.log"),
            json: existing("json.log"),
        }
    }

    fn run_session(inputs: &SessionInputs, strategy_type: StrategyType, config: SessionConfig) -> String {
        let strategy = create_strategy(strategy_type, config);
        let mut temp_output = NamedTempFile::new().expect("Failed to create temp file");

        strategy
            .process(inputs, &mut temp_output)
            .unwrap_or_else(|e| panic!("Failed to reconcile logs: {}", e));

        temp_output.flush().expect("Failed to flush temp file");
        fs::read_to_string(temp_output.path())
            .unwrap_or_else(|e| panic!("Failed to read temp output file: {}", e))
    }

    /// Run a fixture and compare its output with expected.csv
    ///
    /// # Panics
    ///
    /// Panics if the fixture has no log file, or the output doesn't match.
    fn run_test_fixture(fixture_name: &str, strategy_type: StrategyType, config: SessionConfig) {
        let fixture_dir = PathBuf::from(format!("tests/fixtures/{}", fixture_name));
        let expected_path = fixture_dir.join("expected.csv");

        let inputs = fixture_inputs(&fixture_dir);
        assert!(
            inputs.fixed_field.is_some() || inputs.json.is_some(),
            "No log file in fixture: {}",
            fixture_name
        );

        let actual_output = run_session(&inputs, strategy_type, config);
        let expected_output = fs::read_to_string(&expected_path).unwrap_or_else(|e| {
            panic!("Failed to read expected file {}: {}", expected_path.display(), e)
        });

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {} (strategy: {:?})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, strategy_type, actual_output, expected_output
        );
    }

    /// End-to-end test for all fixtures with both strategies
    #[rstest]
    #[case("fixed_field_happy_path")]
    #[case("fixed_field_orphans")]
    #[case("json_matching")]
    #[case("cross_channel")]
    fn test_fixtures(
        #[case] fixture: &str,
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        run_test_fixture(fixture, strategy, SessionConfig::default());
    }

    /// Fixed-field pairing does not depend on where chunks are cut
    #[rstest]
    #[case("fixed_field_happy_path")]
    #[case("fixed_field_orphans")]
    fn test_fixed_field_fixtures_with_small_chunks(
        #[case] fixture: &str,
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
        #[values(1, 3)] chunk_lines: usize,
    ) {
        let config = SessionConfig {
            chunk_lines,
            ..SessionConfig::default()
        };
        run_test_fixture(fixture, strategy, config);
    }

    #[rstest]
    fn test_jsonl_output(#[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType) {
        let inputs = fixture_inputs(Path::new("tests/fixtures/cross_channel"));
        let config = SessionConfig {
            format: OutputFormat::Jsonl,
            ..SessionConfig::default()
        };

        let output = run_session(&inputs, strategy, config);
        let lines: Vec<serde_json::Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).expect("each line is a JSON object"))
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["source"], "ISO8583");
        assert_eq!(lines[0]["amount"], "2500");
        assert!(lines[0]["raw_content"]
            .as_str()
            .is_some_and(|raw| raw.contains("Field 041: [ATM00009]")));
        assert_eq!(lines[1]["source"], "JSON");
        assert_eq!(lines[1]["serial_number"], "SN77");
        assert_eq!(lines[1]["status"], "SUCCESS");
    }

    /// A retention cap of zero surfaces every unmatched entry after each chunk
    #[rstest]
    fn test_retention_cap_evicts_orphans_early(
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        let inputs = fixture_inputs(Path::new("tests/fixtures/fixed_field_happy_path"));
        let config = SessionConfig {
            chunk_lines: 1,
            retention: RetentionPolicy::capped(0),
            ..SessionConfig::default()
        };

        let output = run_session(&inputs, strategy, config);
        let statuses: Vec<&str> = output
            .lines()
            .skip(1)
            .filter_map(|line| line.rsplit(',').next())
            .collect();

        assert_eq!(statuses, vec!["TIMEOUT", "TIMEOUT", "SUCCESS", "FAILED"]);
    }

    #[rstest]
    fn test_missing_input_is_an_error(
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        let inputs = SessionInputs {
            fixed_field: Some(PathBuf::from("tests/fixtures/does_not_exist/fixed_field.log")),
            json: None,
        };

        let result = create_strategy(strategy, SessionConfig::default()).process(&inputs, &mut Vec::new());

        assert!(matches!(result, Err(ReconcileError::FileNotFound { .. })));
    }
}
