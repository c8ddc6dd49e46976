//! Verification runs and their reports.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use triage_core::{emit_verification_stage_finished, emit_verification_timeout, VerificationConfig};
use uuid::Uuid;

use crate::diagnostics::{output_summary, parse_build_errors, parse_test_failures, Failure};
use crate::runner::CommandRunner;
use crate::stage::{StageConfig, VerifyStage};

/// Maximum characters of a test error quoted in an error message.
const ERROR_EXCERPT_CHARS: usize = 500;

/// Result of one verification stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageResult {
    pub stage: VerifyStage,
    pub passed: bool,
    pub exit_code: i32,
    pub failures: Vec<Failure>,
    pub output_summary: String,
    pub duration_ms: u64,
}

/// Outcome of a verification run across one or more stages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerificationReport {
    pub run_id: Uuid,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tests_passed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_passed: Option<bool>,
    pub failures: Vec<Failure>,
    pub error_messages: Vec<String>,
    pub stages: Vec<StageResult>,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl VerificationReport {
    /// Number of stages that passed.
    pub fn passed_count(&self) -> usize {
        self.stages.iter().filter(|s| s.passed).count()
    }

    /// Number of stages that failed.
    pub fn failed_count(&self) -> usize {
        self.stages.iter().filter(|s| !s.passed).count()
    }
}

/// Runs verification stages from the repository config.
pub struct Verifier {
    config: VerificationConfig,
    workdir: PathBuf,
}

impl Verifier {
    pub fn new(config: VerificationConfig, workdir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Run a single stage and parse its failures.
    pub async fn run_stage(&self, stage: VerifyStage) -> StageResult {
        let stage_config = StageConfig::from_config(stage, &self.config);
        let output = CommandRunner::run_stage(&stage_config, &self.workdir).await;

        if output.timed_out {
            emit_verification_timeout(stage.name(), stage_config.timeout_secs);
        }
        emit_verification_stage_finished(stage.name(), output.exit_code, output.duration_ms);

        let combined = output.combined();
        let failures = if output.passed() {
            Vec::new()
        } else {
            match stage {
                VerifyStage::Tests => parse_test_failures(&combined),
                VerifyStage::Build => parse_build_errors(&combined),
            }
        };

        StageResult {
            stage,
            passed: output.passed(),
            exit_code: output.exit_code,
            failures,
            output_summary: output_summary(&combined),
            duration_ms: output.duration_ms,
        }
    }

    /// Run `stages` in order and aggregate the outcome.
    pub async fn verify(&self, stages: &[VerifyStage]) -> VerificationReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let start = Instant::now();
        info!(run_id = %run_id, stages = stages.len(), "starting verification");

        let mut report = VerificationReport {
            run_id,
            success: true,
            tests_passed: None,
            build_passed: None,
            failures: Vec::new(),
            error_messages: Vec::new(),
            stages: Vec::new(),
            started_at,
            duration_ms: 0,
        };

        for &stage in stages {
            let result = self.run_stage(stage).await;
            match stage {
                VerifyStage::Tests => report.tests_passed = Some(result.passed),
                VerifyStage::Build => report.build_passed = Some(result.passed),
            }
            if !result.passed {
                report.success = false;
                report
                    .error_messages
                    .extend(result.failures.iter().filter_map(error_message));
                report.failures.extend(result.failures.iter().cloned());
            }
            report.stages.push(result);
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(run_id = %run_id, success = report.success, "verification finished");
        report
    }

    /// Tests, then build.
    pub async fn verify_all(&self) -> VerificationReport {
        self.verify(&[VerifyStage::Tests, VerifyStage::Build]).await
    }
}

fn error_message(failure: &Failure) -> Option<String> {
    match failure {
        Failure::TestFailure { error, .. } if error.is_empty() => None,
        Failure::TestFailure { test, error } => {
            let excerpt: String = error.chars().take(ERROR_EXCERPT_CHARS).collect();
            Some(format!("Test failure in {test}: {excerpt}"))
        }
        Failure::BuildError { message, .. } => Some(format!("Build error: {message}")),
    }
}
