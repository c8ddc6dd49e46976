//! Error taxonomy for the collaborators around the triage engine.
//!
//! The engine itself never fails; these errors come from configuration
//! discovery and parsing.

use std::path::PathBuf;

/// Triage errors.
#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("config parse error in {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("unsupported config format: {0}")]
    UnsupportedConfigFormat(PathBuf),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for triage collaborator operations.
pub type Result<T> = std::result::Result<T, TriageError>;
