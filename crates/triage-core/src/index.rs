//! Resolve search-index names from URLs and ticket text.

use std::collections::{BTreeMap, BTreeSet};

/// Domain-substring → index-name table. Empty unless configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexResolver {
    mapping: BTreeMap<String, String>,
}

impl IndexResolver {
    pub fn new(mapping: BTreeMap<String, String>) -> Self {
        Self { mapping }
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// Index names whose domain occurs in any lower-cased URL.
    pub fn indices_from_urls<S: AsRef<str>>(&self, urls: &[S]) -> BTreeSet<String> {
        let mut indices = BTreeSet::new();
        for url in urls {
            let url_lower = url.as_ref().to_lowercase();
            for (domain, index_name) in &self.mapping {
                if url_lower.contains(domain.as_str()) {
                    indices.insert(index_name.clone());
                }
            }
        }
        indices
    }

    /// Index names whose domain or own name occurs in the text.
    pub fn indices_from_text(&self, text: &str) -> BTreeSet<String> {
        let text_lower = text.to_lowercase();
        self.mapping
            .iter()
            .filter(|(domain, index_name)| {
                text_lower.contains(&index_name.to_lowercase())
                    || text_lower.contains(&domain.to_lowercase())
            })
            .map(|(_, index_name)| index_name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> IndexResolver {
        IndexResolver::new(BTreeMap::from([
            ("books.example.com".to_string(), "books_prod".to_string()),
            ("staging.example.com".to_string(), "books_staging".to_string()),
            ("shop.example.org".to_string(), "books_prod".to_string()),
        ]))
    }

    #[test]
    fn test_indices_from_urls() {
        let indices = resolver().indices_from_urls(&[
            "https://BOOKS.example.com/item/1",
            "https://shop.example.org/x",
            "https://other.net",
        ]);
        assert_eq!(indices, BTreeSet::from(["books_prod".to_string()]));
    }

    #[test]
    fn test_indices_from_text_matches_name_or_domain() {
        let indices =
            resolver().indices_from_text("Results differ between BOOKS_STAGING and the main site");
        assert_eq!(indices, BTreeSet::from(["books_staging".to_string()]));

        let indices = resolver().indices_from_text("see books.example.com");
        assert_eq!(indices, BTreeSet::from(["books_prod".to_string()]));
    }

    #[test]
    fn test_empty_mapping_yields_nothing() {
        let resolver = IndexResolver::default();
        assert!(resolver.is_empty());
        assert!(resolver.indices_from_urls(&["https://books.example.com"]).is_empty());
        assert!(resolver.indices_from_text("books_prod").is_empty());
    }
}
