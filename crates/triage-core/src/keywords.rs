//! Keyword tables and case-insensitive phrase matching.
//!
//! The tables are a single versioned constant set. Classifier and eligibility
//! scorer receive a [`KeywordTables`] at construction instead of reading
//! module globals, so alternative tables can be injected in tests.

use serde::Serialize;

/// Named keyword lists used by the classifier and the eligibility scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeywordTables {
    /// Table set identifier, reported in logs.
    pub version: &'static str,
    pub code_change: &'static [&'static str],
    pub investigation: &'static [&'static str],
    pub skip: &'static [&'static str],
    pub test: &'static [&'static str],
    pub build: &'static [&'static str],
    pub vague: &'static [&'static str],
    pub design_decision: &'static [&'static str],
}

impl KeywordTables {
    /// Canonical table set: classification lists plus the eligibility groups.
    pub const V2: KeywordTables = KeywordTables {
        version: "v2",
        code_change: &[
            "add",
            "implement",
            "create",
            "build",
            "develop",
            "fix",
            "bug",
            "error",
            "broken",
            "failing",
            "update",
            "modify",
            "change",
            "refactor",
            "remove",
            "delete",
            "deprecate",
            "configure",
            "enable",
            "disable",
            "integrate",
            "connect",
            "support",
        ],
        investigation: &[
            "not appearing",
            "not showing",
            "missing",
            "why",
            "investigate",
            "check",
            "look into",
            "cannot find",
            "doesn't exist",
            "no results",
            "no longer",
            "not working",
            "broken link",
        ],
        skip: &[
            "meeting",
            "waiting for",
            "blocked by",
            "pending approval",
            "need access",
            "credentials required",
            "documentation only",
            "write docs",
            "update readme",
        ],
        test: &[
            "pytest",
            "unit test",
            "integration test",
            "test case",
            "add a test",
            "add tests",
            "tests pass",
            "assert",
            "expected output",
            "expected result",
            "should return",
            "should raise",
            "acceptance criteria",
        ],
        build: &[
            "linter",
            "linting",
            "flake8",
            "pylint",
            "ruff check",
            "black --check",
            "mypy",
            "type check",
            "typecheck",
            "docker build",
            "docker-compose",
            "compile",
            "ci pipeline",
        ],
        vague: &[
            "improve",
            "better",
            "somehow",
            "maybe",
            "nice to have",
            "clean up",
            "cleanup",
            "user friendly",
            "more intuitive",
            "look and feel",
            "as needed",
            "etc.",
        ],
        design_decision: &[
            "design the approach",
            "architecture",
            "decide how",
            "decide whether",
            "which approach",
            "trade-off",
            "tradeoff",
            "propose a solution",
            "evaluate options",
            "rfc",
        ],
    };
}

impl Default for KeywordTables {
    fn default() -> Self {
        Self::V2
    }
}

/// Keywords that occur in `text` as case-insensitive substrings, in keyword order.
pub fn find_matching(text: &str, keywords: &[&str]) -> Vec<String> {
    let text_lower = text.to_lowercase();
    keywords
        .iter()
        .filter(|kw| text_lower.contains(&kw.to_lowercase()))
        .map(|kw| kw.to_string())
        .collect()
}

/// Number of keywords that occur in `text`.
pub fn count_matching(text: &str, keywords: &[&str]) -> usize {
    find_matching(text, keywords).len()
}

/// Whether any keyword occurs in `text`.
pub fn any_matching(text: &str, keywords: &[&str]) -> bool {
    let text_lower = text.to_lowercase();
    keywords
        .iter()
        .any(|kw| text_lower.contains(&kw.to_lowercase()))
}
