//! Structured signal extraction from free ticket text.
//!
//! Pulls ISBNs, URLs, file paths and function/class references out of a
//! ticket using fixed regular expressions. Matches are returned in order of
//! appearance and are never deduplicated.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

// Pattern literals are fixed; compilation cannot fail at runtime.
static ISBN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b978\d{10}\b").expect("ISBN pattern is valid"));

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"]+"#).expect("URL pattern is valid"));

static FILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[\w/]+\.(?:py|yaml|json|xml)\b").expect("file pattern is valid")
});

static FUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:def\s+\w+|class\s+\w+|\w+\(\))").expect("function pattern is valid")
});

/// Signals extracted once per classification call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedData {
    pub isbns: Vec<String>,
    pub urls: Vec<String>,
    pub file_refs: Vec<String>,
    pub function_refs: Vec<String>,
}

impl ExtractedData {
    pub fn has_urls(&self) -> bool {
        !self.urls.is_empty()
    }

    pub fn has_file_refs(&self) -> bool {
        !self.file_refs.is_empty()
    }

    pub fn has_function_refs(&self) -> bool {
        !self.function_refs.is_empty()
    }
}

/// Run every extractor over `text`.
pub fn extract(text: &str) -> ExtractedData {
    ExtractedData {
        isbns: extract_isbns(text),
        urls: extract_urls(text),
        file_refs: extract_file_refs(text),
        function_refs: extract_function_refs(text),
    }
}

/// 13-digit runs starting with `978`. The checksum digit is not validated.
pub fn extract_isbns(text: &str) -> Vec<String> {
    find_all(&ISBN_RE, text)
}

pub fn extract_urls(text: &str) -> Vec<String> {
    find_all(&URL_RE, text)
}

/// Word/slash runs ending in `.py`, `.yaml`, `.json` or `.xml`.
pub fn extract_file_refs(text: &str) -> Vec<String> {
    find_all(&FILE_RE, text)
}

/// `def name`, `class Name` and `name()` shapes.
pub fn extract_function_refs(text: &str) -> Vec<String> {
    find_all(&FUNCTION_RE, text)
}

fn find_all(re: &Regex, text: &str) -> Vec<String> {
    re.find_iter(text).map(|m| m.as_str().to_string()).collect()
}
