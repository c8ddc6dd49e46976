//! Triage Verify - test and build verification
//!
//! Runs the repository's configured test and build commands before a change
//! is handed back:
//! - Executes each stage through the shell with a timeout
//! - Parses pytest failures and build error lines
//! - Aggregates a pass/fail report

pub mod diagnostics;
pub mod report;
pub mod runner;
pub mod stage;

// Re-export key types
pub use diagnostics::{output_summary, parse_build_errors, parse_test_failures, Failure};
pub use report::{StageResult, VerificationReport, Verifier};
pub use runner::{CommandOutput, CommandRunner, FAILED_EXIT_CODE};
pub use stage::{StageConfig, VerifyStage};
