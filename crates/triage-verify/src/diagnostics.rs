//! Parse test and build output into failure records.

use serde::{Deserialize, Serialize};

/// Maximum characters of combined output kept in a stage summary.
pub const OUTPUT_SUMMARY_CHARS: usize = 2000;

/// A single failure extracted from command output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Failure {
    /// A failed test from a pytest summary.
    TestFailure { test: String, error: String },

    /// An error line from build output.
    BuildError { line: usize, message: String },
}

impl Failure {
    /// Short label for listings.
    pub fn label(&self) -> &str {
        match self {
            Failure::TestFailure { test, .. } => test,
            Failure::BuildError { message, .. } => message,
        }
    }
}

/// Extract failures from pytest output.
///
/// A `FAILED <path> ...` line opens a failure; following lines mentioning
/// `Error` or `assert` are appended to its error text.
pub fn parse_test_failures(output: &str) -> Vec<Failure> {
    let mut failures = Vec::new();
    let mut current: Option<(String, String)> = None;

    for line in output.split('\n') {
        if let Some(rest) = line.strip_prefix("FAILED ") {
            if let Some((test, error)) = current.take() {
                failures.push(Failure::TestFailure { test, error });
            }
            let test = rest.split(' ').next().unwrap_or_default().to_string();
            current = Some((test, String::new()));
        } else if let Some((_, error)) = current.as_mut() {
            if line.contains("Error") || line.to_lowercase().contains("assert") {
                error.push_str(line);
                error.push('\n');
            }
        }
    }

    if let Some((test, error)) = current {
        failures.push(Failure::TestFailure { test, error });
    }
    failures
}

/// Every line mentioning `error` (any case), with its 1-based line number.
pub fn parse_build_errors(output: &str) -> Vec<Failure> {
    output
        .split('\n')
        .enumerate()
        .filter(|(_, line)| line.to_lowercase().contains("error"))
        .map(|(i, line)| Failure::BuildError {
            line: i + 1,
            message: line.trim().to_string(),
        })
        .collect()
}

/// Last [`OUTPUT_SUMMARY_CHARS`] characters of `output`.
pub fn output_summary(output: &str) -> String {
    let count = output.chars().count();
    if count <= OUTPUT_SUMMARY_CHARS {
        return output.to_string();
    }
    output.chars().skip(count - OUTPUT_SUMMARY_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PYTEST_OUTPUT: &str = "\
============ short test summary info ============
FAILED tests/test_api.py::test_get - AssertionError: 404 != 200
E       assert 404 == 200
    some context line
FAILED tests/test_db.py::test_save
E   KeyError: 'id'
== 2 failed, 10 passed ==";

    #[test]
    fn test_parse_test_failures() {
        let failures = parse_test_failures(PYTEST_OUTPUT);
        assert_eq!(failures.len(), 2);
        assert_eq!(
            failures[0],
            Failure::TestFailure {
                test: "tests/test_api.py::test_get".to_string(),
                error: "E       assert 404 == 200\n".to_string(),
            }
        );
        assert_eq!(failures[1].label(), "tests/test_db.py::test_save");
        match &failures[1] {
            Failure::TestFailure { error, .. } => assert_eq!(error, "E   KeyError: 'id'\n"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_lines_before_first_failure_ignored() {
        assert!(parse_test_failures("AssertionError somewhere\nall good").is_empty());
    }

    #[test]
    fn test_parse_build_errors() {
        let failures = parse_build_errors("step 1\n  ERROR: missing dep  \nok\nTypeError: x");
        assert_eq!(
            failures,
            vec![
                Failure::BuildError {
                    line: 2,
                    message: "ERROR: missing dep".to_string()
                },
                Failure::BuildError {
                    line: 4,
                    message: "TypeError: x".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_failure_serializes_with_type_tag() {
        let value = serde_json::to_value(Failure::BuildError {
            line: 1,
            message: "error".to_string(),
        })
        .expect("serialize");
        assert_eq!(value["type"], "build_error");
        assert_eq!(value["line"], 1);
    }

    #[test]
    fn test_output_summary_keeps_tail() {
        let long = format!("{}END", "x".repeat(3000));
        let summary = output_summary(&long);
        assert_eq!(summary.chars().count(), OUTPUT_SUMMARY_CHARS);
        assert!(summary.ends_with("END"));
        assert_eq!(output_summary("short"), "short");
    }
}
