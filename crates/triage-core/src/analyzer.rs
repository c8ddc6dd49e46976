//! End-to-end ticket analysis: classify, then enrich by disposition.

use crate::classifier::TicketClassifier;
use crate::code_map::CodeMapper;
use crate::config::TriageConfig;
use crate::domain::{
    ClassificationResult, CodeChangeDetails, InvestigationDetails, TicketType, TypeDetails,
};
use crate::eligibility::{EligibilityScorer, TicketParts};
use crate::index::IndexResolver;
use crate::keywords::KeywordTables;
use crate::obs;

/// Number of raw file mappings attached to a CODE_CHANGE result.
pub const MAX_FILE_MAPPINGS: usize = 5;

/// Classifier, scorer, mapper and resolver wired from one rule set.
#[derive(Debug, Clone, Default)]
pub struct TicketAnalyzer {
    classifier: TicketClassifier,
    scorer: EligibilityScorer,
    mapper: CodeMapper,
    resolver: IndexResolver,
}

impl TicketAnalyzer {
    pub fn new(tables: KeywordTables, mapper: CodeMapper, resolver: IndexResolver) -> Self {
        Self {
            classifier: TicketClassifier::new(tables),
            scorer: EligibilityScorer::new(tables),
            mapper,
            resolver,
        }
    }

    /// Build from the repository config's mapping tables.
    pub fn from_config(config: &TriageConfig) -> Self {
        Self::new(
            KeywordTables::default(),
            CodeMapper::with_rules(config.code_mapping.patterns.clone()),
            IndexResolver::new(config.index_url_mapping.clone()),
        )
    }

    /// Classify the ticket and attach the type-specific extension.
    pub fn analyze(
        &self,
        summary: &str,
        description: &str,
        comments: &str,
    ) -> ClassificationResult {
        let parts = TicketParts::new(summary, description, comments);
        let full_text = parts.full_text();

        let mut result = self
            .classifier
            .classify_with_comments(summary, description, comments);

        result.details = match result.ticket_type {
            TicketType::CodeChange => {
                let ralph_eligibility = self.scorer.assess(&parts, &result);
                obs::emit_eligibility_assessed(
                    ralph_eligibility.eligible,
                    ralph_eligibility.confidence,
                    ralph_eligibility.disqualifiers.len(),
                );
                let mut file_mappings = self.mapper.map_to_files(&full_text);
                file_mappings.truncate(MAX_FILE_MAPPINGS);
                Some(TypeDetails::CodeChange(CodeChangeDetails {
                    suggested_files: self.mapper.primary_files(&full_text),
                    file_mappings,
                    ralph_eligibility,
                }))
            }
            TicketType::Investigation => {
                let mut indices = self.resolver.indices_from_urls(&result.extracted_data.urls);
                indices.extend(self.resolver.indices_from_text(&full_text));
                Some(TypeDetails::Investigation(InvestigationDetails {
                    suggested_indices: indices.into_iter().collect(),
                }))
            }
            TicketType::Skip => None,
        };

        obs::emit_ticket_classified(result.ticket_type.as_str(), result.confidence);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code_map::CodeMappingRule;
    use std::collections::BTreeMap;

    fn analyzer() -> TicketAnalyzer {
        TicketAnalyzer::new(
            KeywordTables::default(),
            CodeMapper::with_rules(vec![CodeMappingRule::new(
                ["search", "ranking"],
                ["search/ranker.py"],
            )]),
            IndexResolver::new(BTreeMap::from([(
                "books.example.com".to_string(),
                "books_prod".to_string(),
            )])),
        )
    }

    #[test]
    fn test_code_change_gets_files_and_eligibility() {
        let result = analyzer().analyze(
            "Fix search ranking",
            "ranking is reversed in search/ranker.py",
            "",
        );
        assert_eq!(result.ticket_type, TicketType::CodeChange);
        let details = result.code_change_details().expect("code change details");
        assert_eq!(details.suggested_files, vec!["search/ranker.py"]);
        assert_eq!(details.file_mappings.len(), 1);
        assert!(details
            .ralph_eligibility
            .criteria_met
            .contains(&"specific_files".to_string()));
        assert!(result.investigation_details().is_none());
        assert!(result.details_match_type());
    }

    #[test]
    fn test_investigation_gets_indices() {
        let result = analyzer().analyze(
            "Title missing",
            "Not showing on https://books.example.com/item/9781234567897",
            "",
        );
        assert_eq!(result.ticket_type, TicketType::Investigation);
        let details = result.investigation_details().expect("investigation details");
        assert_eq!(details.suggested_indices, vec!["books_prod"]);
        assert!(result.details_match_type());
    }

    #[test]
    fn test_skip_has_no_details() {
        let result = analyzer().analyze("Sprint meeting", "", "");
        assert_eq!(result.ticket_type, TicketType::Skip);
        assert!(result.details.is_none());
    }

    #[test]
    fn test_from_default_config_uses_builtin_rules() {
        let analyzer = TicketAnalyzer::from_config(&TriageConfig::default());
        let result = analyzer.analyze("Fix index filter", "in config/indexConfig.py", "");
        let details = result.code_change_details().expect("details");
        assert_eq!(details.suggested_files[0], "config/indexConfig.py");
    }
}
