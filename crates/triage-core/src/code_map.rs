//! Map ticket text to candidate source files.
//!
//! Rules come from the repository config (`code_mapping.patterns`); the
//! built-in [`DEFAULT_RULES`] apply when none are configured.

use serde::{Deserialize, Serialize};

use crate::domain::FileMapping;

/// Minimum confidence for a primary file suggestion.
pub const PRIMARY_MIN_CONFIDENCE: f64 = 0.3;

/// Maximum number of primary file suggestions.
pub const PRIMARY_MAX_FILES: usize = 5;

/// Keyword → file rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CodeMappingRule {
    pub keywords: Vec<String>,
    pub files: Vec<String>,
}

impl CodeMappingRule {
    pub fn new<K, F>(keywords: K, files: F) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            files: files.into_iter().map(Into::into).collect(),
        }
    }
}

/// Static shape of a built-in rule.
#[derive(Debug, Clone, Copy)]
pub struct StaticRule {
    pub keywords: &'static [&'static str],
    pub files: &'static [&'static str],
}

/// Built-in rules used when the repository configures none.
pub const DEFAULT_RULES: &[StaticRule] = &[
    StaticRule {
        keywords: &["index", "indices", "filter", "filtering", "site config"],
        files: &["config/indexConfig.py"],
    },
    StaticRule {
        keywords: &["config", "configuration", "settings"],
        files: &["config/"],
    },
];

/// Ranks candidate files for a piece of ticket text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeMapper {
    rules: Vec<CodeMappingRule>,
}

impl Default for CodeMapper {
    fn default() -> Self {
        Self::with_rules(Vec::new())
    }
}

impl CodeMapper {
    /// Use `rules`, falling back to [`DEFAULT_RULES`] when empty.
    pub fn with_rules(rules: Vec<CodeMappingRule>) -> Self {
        if rules.is_empty() {
            Self {
                rules: DEFAULT_RULES
                    .iter()
                    .map(|r| {
                        CodeMappingRule::new(r.keywords.iter().copied(), r.files.iter().copied())
                    })
                    .collect(),
            }
        } else {
            Self { rules }
        }
    }

    pub fn rules(&self) -> &[CodeMappingRule] {
        &self.rules
    }

    /// Every file named by a rule with at least one matching keyword,
    /// ordered by descending confidence (stable for ties).
    pub fn map_to_files(&self, text: &str) -> Vec<FileMapping> {
        let text_lower = text.to_lowercase();
        let mut results = Vec::new();

        for rule in &self.rules {
            let matched: Vec<String> = rule
                .keywords
                .iter()
                .filter(|kw| text_lower.contains(&kw.to_lowercase()))
                .cloned()
                .collect();
            if matched.is_empty() {
                continue;
            }

            let confidence = (matched.len() as f64 / rule.keywords.len() as f64).min(1.0);
            for file in &rule.files {
                results.push(FileMapping {
                    file: file.clone(),
                    keywords_matched: matched.clone(),
                    confidence,
                });
            }
        }

        results.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        results
    }

    /// Deduplicated files with confidence at least [`PRIMARY_MIN_CONFIDENCE`],
    /// capped at [`PRIMARY_MAX_FILES`].
    pub fn primary_files(&self, text: &str) -> Vec<String> {
        let mut primary: Vec<String> = Vec::new();
        for mapping in self.map_to_files(text) {
            if mapping.confidence < PRIMARY_MIN_CONFIDENCE || primary.contains(&mapping.file) {
                continue;
            }
            primary.push(mapping.file);
            if primary.len() == PRIMARY_MAX_FILES {
                break;
            }
        }
        primary
    }
}
