//! Repository-level configuration discovery and loading.
//!
//! The config lives at `<repo root>/.triage/jira-config.yaml` (or `.json`),
//! with `.claude/` still read for repositories set up before the move;
//! `TRIAGE_CONFIG` points at an explicit file instead. Every section is
//! merged field by field over its defaults, so a file only needs the keys it
//! changes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::code_map::CodeMappingRule;
use crate::domain::{Result, TriageError};
use crate::obs;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "TRIAGE_CONFIG";

/// Config directory under the repository root.
pub const CONFIG_DIR: &str = ".triage";

/// Previous config directory, searched after [`CONFIG_DIR`].
pub const LEGACY_CONFIG_DIR: &str = ".claude";

pub const CONFIG_YAML: &str = "jira-config.yaml";
pub const CONFIG_JSON: &str = "jira-config.json";

/// Default timeout for verification commands.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct JiraConfig {
    pub projects: Vec<String>,
    pub statuses: Vec<String>,
    pub max_tickets_per_run: u32,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            projects: Vec::new(),
            statuses: vec![
                "Open".to_string(),
                "In Progress".to_string(),
                "To Do".to_string(),
            ],
            max_tickets_per_run: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GithubConfig {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub base_branch: String,
    pub branch_prefix: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            owner: None,
            repo: None,
            base_branch: "main".to_string(),
            branch_prefix: "feature/".to_string(),
        }
    }
}

/// Commands used to verify a change before it is handed back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VerificationConfig {
    pub max_fix_attempts: u32,
    pub test_command: String,
    pub build_command: String,
    pub timeout_seconds: u64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            max_fix_attempts: 3,
            test_command: "python -m pytest".to_string(),
            build_command: "docker-compose build".to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CodeMappingConfig {
    pub patterns: Vec<CodeMappingRule>,
}

/// Merged repository configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TriageConfig {
    pub jira: JiraConfig,
    pub github: GithubConfig,
    pub verification: VerificationConfig,
    pub code_mapping: CodeMappingConfig,
    pub index_url_mapping: BTreeMap<String, String>,
    pub project: Value,
    pub investigation: Value,
}

impl TriageConfig {
    /// Parse a config file; YAML or JSON is chosen by extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        let parse_err = |message: String| TriageError::ConfigParse {
            path: path.to_path_buf(),
            message,
        };

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&raw).map_err(|e| parse_err(e.to_string()))
            }
            Some("json") => serde_json::from_str(&raw).map_err(|e| parse_err(e.to_string())),
            _ => Err(TriageError::UnsupportedConfigFormat(path.to_path_buf())),
        }
    }

    /// Pretty JSON rendering of the merged config.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Walk up from `start` to the first directory containing `.git`.
pub fn find_repo_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").is_dir())
        .map(Path::to_path_buf)
}

/// Locate the config file under `repo_root`, preferring YAML.
///
/// [`CONFIG_DIR`] wins over [`LEGACY_CONFIG_DIR`].
pub fn find_config_file(repo_root: &Path) -> Option<PathBuf> {
    [CONFIG_DIR, LEGACY_CONFIG_DIR]
        .into_iter()
        .flat_map(|dir| {
            [CONFIG_YAML, CONFIG_JSON]
                .into_iter()
                .map(move |name| repo_root.join(dir).join(name))
        })
        .find(|p| p.is_file())
}

/// Load the config for the repository containing `start`.
///
/// Missing repository or missing file yields defaults.
pub fn load_config_from(start: &Path) -> Result<TriageConfig> {
    let Some(root) = find_repo_root(start) else {
        debug!(start = %start.display(), "no repository root, using default config");
        return Ok(TriageConfig::default());
    };
    match find_config_file(&root) {
        Some(path) => {
            let config = TriageConfig::from_path(&path)?;
            obs::emit_config_loaded(&path.display().to_string());
            Ok(config)
        }
        None => {
            debug!(root = %root.display(), "no config file, using defaults");
            Ok(TriageConfig::default())
        }
    }
}

/// Load the config from `TRIAGE_CONFIG` or by discovery from the working directory.
pub fn load_config() -> Result<TriageConfig> {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV) {
        let path = PathBuf::from(explicit);
        let config = TriageConfig::from_path(&path)?;
        obs::emit_config_loaded(&path.display().to_string());
        return Ok(config);
    }
    let cwd = std::env::current_dir()?;
    load_config_from(&cwd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn repo_with(name: &str, contents: &str) -> tempfile::TempDir {
        let dir = tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join(".git")).expect("git dir");
        std::fs::create_dir(dir.path().join(CONFIG_DIR)).expect("config dir");
        std::fs::write(dir.path().join(CONFIG_DIR).join(name), contents).expect("write");
        dir
    }

    #[test]
    fn test_defaults() {
        let config = TriageConfig::default();
        assert_eq!(config.verification.timeout_seconds, 300);
        assert_eq!(config.verification.test_command, "python -m pytest");
        assert_eq!(config.github.base_branch, "main");
        assert_eq!(config.jira.statuses.len(), 3);
        assert!(config.index_url_mapping.is_empty());
        assert!(config.code_mapping.patterns.is_empty());
    }

    #[test]
    fn test_yaml_merges_over_defaults() {
        let repo = repo_with(
            CONFIG_YAML,
            r#"
verification:
  test_command: "pytest -q"
github:
  owner: acme
code_mapping:
  patterns:
    - keywords: [search, ranking]
      files: [search/ranker.py]
index_url_mapping:
  books.example.com: books_prod
"#,
        );
        let nested = repo.path().join("pkg").join("sub");
        std::fs::create_dir_all(&nested).expect("nested");

        let config = load_config_from(&nested).expect("load");
        assert_eq!(config.verification.test_command, "pytest -q");
        assert_eq!(config.verification.build_command, "docker-compose build");
        assert_eq!(config.verification.timeout_seconds, 300);
        assert_eq!(config.github.owner.as_deref(), Some("acme"));
        assert_eq!(config.github.branch_prefix, "feature/");
        assert_eq!(config.code_mapping.patterns[0].files, vec!["search/ranker.py"]);
        assert_eq!(
            config.index_url_mapping.get("books.example.com").map(String::as_str),
            Some("books_prod")
        );
    }

    #[test]
    fn test_json_config() {
        let repo = repo_with(CONFIG_JSON, r#"{ "verification": { "timeout_seconds": 30 } }"#);
        let config = load_config_from(repo.path()).expect("load");
        assert_eq!(config.verification.timeout_seconds, 30);
        assert_eq!(config.verification.max_fix_attempts, 3);
    }

    #[test]
    fn test_yaml_preferred_over_json() {
        let repo = repo_with(CONFIG_JSON, r#"{ "jira": { "max_tickets_per_run": 1 } }"#);
        std::fs::write(
            repo.path().join(CONFIG_DIR).join(CONFIG_YAML),
            "jira:\n  max_tickets_per_run: 2\n",
        )
        .expect("write yaml");
        let config = load_config_from(repo.path()).expect("load");
        assert_eq!(config.jira.max_tickets_per_run, 2);
    }

    #[test]
    fn test_legacy_config_dir_is_read() {
        let dir = tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join(".git")).expect("git dir");
        std::fs::create_dir(dir.path().join(LEGACY_CONFIG_DIR)).expect("legacy dir");
        std::fs::write(
            dir.path().join(LEGACY_CONFIG_DIR).join(CONFIG_YAML),
            "jira:\n  max_tickets_per_run: 4\n",
        )
        .expect("write legacy");

        let config = load_config_from(dir.path()).expect("load");
        assert_eq!(config.jira.max_tickets_per_run, 4);

        std::fs::create_dir(dir.path().join(CONFIG_DIR)).expect("config dir");
        std::fs::write(
            dir.path().join(CONFIG_DIR).join(CONFIG_JSON),
            r#"{ "jira": { "max_tickets_per_run": 7 } }"#,
        )
        .expect("write current");
        let config = load_config_from(dir.path()).expect("load");
        assert_eq!(config.jira.max_tickets_per_run, 7);
    }

    #[test]
    fn test_missing_repo_or_file_yields_defaults() {
        let dir = tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join(".git")).expect("git dir");
        let config = load_config_from(dir.path()).expect("load");
        assert_eq!(config, TriageConfig::default());
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let repo = repo_with(CONFIG_YAML, "  \n");
        let config = load_config_from(repo.path()).expect("load");
        assert_eq!(config, TriageConfig::default());
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let repo = repo_with(CONFIG_JSON, "{ not json");
        let err = load_config_from(repo.path()).expect_err("must fail");
        assert!(matches!(err, TriageError::ConfigParse { .. }));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "a = 1").expect("write");
        let err = TriageConfig::from_path(&path).expect_err("must fail");
        assert!(matches!(err, TriageError::UnsupportedConfigFormat(_)));
    }

    #[test]
    fn test_to_json_pretty() {
        let json = TriageConfig::default().to_json_pretty().expect("json");
        assert!(json.contains("\"timeout_seconds\": 300"));
    }
}
