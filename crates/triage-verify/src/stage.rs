//! Verification stage definitions and configuration.

use serde::{Deserialize, Serialize};
use triage_core::VerificationConfig;

/// Verification stages run before a change is handed back.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VerifyStage {
    /// Project test suite.
    Tests,

    /// Project build.
    Build,
}

impl VerifyStage {
    /// Get the stage name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            VerifyStage::Tests => "tests",
            VerifyStage::Build => "build",
        }
    }

    /// Shell command for this stage from the verification config.
    pub fn command<'a>(&self, config: &'a VerificationConfig) -> &'a str {
        match self {
            VerifyStage::Tests => &config.test_command,
            VerifyStage::Build => &config.build_command,
        }
    }
}

/// Configuration for a single stage run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageConfig {
    pub stage: VerifyStage,

    /// Shell command line, run through `sh -c`.
    pub command: String,

    /// Timeout in seconds (0 disables the timeout).
    pub timeout_secs: u64,
}

impl StageConfig {
    /// Build a stage from the repository's verification config.
    pub fn from_config(stage: VerifyStage, config: &VerificationConfig) -> Self {
        Self {
            stage,
            command: stage.command(config).to_string(),
            timeout_secs: config.timeout_seconds,
        }
    }

    /// Create a stage with an explicit command.
    pub fn custom(stage: VerifyStage, command: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            stage,
            command: command.into(),
            timeout_secs,
        }
    }
}
