//! Ticket classification into CODE_CHANGE / INVESTIGATION / SKIP.
//!
//! Classification is an ordered rule chain evaluated over two weighted
//! scores. The order is significant for ambiguous tickets:
//!
//! 1. Skip override: any skip keyword wins outright.
//! 2. Investigation: must beat the code-change score and clear an absolute floor.
//! 3. Code change: must clear its own floor.
//! 4. Default: skip with low confidence.

use tracing::debug;

use crate::domain::{ClassificationResult, TicketType};
use crate::keywords::{find_matching, KeywordTables};
use crate::signals::{extract, ExtractedData};

/// Confidence reported when a skip keyword short-circuits classification.
pub const SKIP_OVERRIDE_CONFIDENCE: f64 = 0.9;

/// Confidence reported when no rule fires.
pub const DEFAULT_SKIP_CONFIDENCE: f64 = 0.5;

/// Minimum investigation score, independent of the code-change score.
pub const INVESTIGATION_FLOOR: i32 = 3;

/// Minimum code-change score.
pub const CODE_CHANGE_FLOOR: i32 = 2;

/// Score contributed by each matched keyword.
pub const KEYWORD_WEIGHT: i32 = 2;

pub const URL_BONUS: i32 = 2;
pub const FILE_REF_BONUS: i32 = 3;
pub const FUNCTION_REF_BONUS: i32 = 2;

/// Score that maps to full confidence.
const CONFIDENCE_SCALE: f64 = 10.0;

/// Intermediate scores, exposed for logging and regression tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scores {
    pub investigation: i32,
    pub code_change: i32,
    pub investigation_matches: Vec<String>,
    pub code_change_matches: Vec<String>,
}

/// Keyword-driven ticket classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicketClassifier {
    tables: KeywordTables,
}

impl TicketClassifier {
    pub fn new(tables: KeywordTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &KeywordTables {
        &self.tables
    }

    /// Classify a ticket from its summary and description.
    pub fn classify(&self, summary: &str, description: &str) -> ClassificationResult {
        self.classify_text(&ticket_text(summary, description, ""))
    }

    /// Classify a ticket including its formatted comments.
    pub fn classify_with_comments(
        &self,
        summary: &str,
        description: &str,
        comments: &str,
    ) -> ClassificationResult {
        self.classify_text(&ticket_text(summary, description, comments))
    }

    /// Classify an already-joined ticket text.
    pub fn classify_text(&self, text: &str) -> ClassificationResult {
        let extracted = extract(text);

        let skip_matches = find_matching(text, self.tables.skip);
        if !skip_matches.is_empty() {
            debug!(matches = ?skip_matches, "skip override");
            return ClassificationResult::new(
                TicketType::Skip,
                SKIP_OVERRIDE_CONFIDENCE,
                format!("Contains skip indicators: {}", skip_matches.join(", ")),
                extracted,
            );
        }

        let scores = self.score(text, &extracted);
        debug!(
            investigation = scores.investigation,
            code_change = scores.code_change,
            tables = self.tables.version,
            "ticket scored"
        );

        if scores.investigation > scores.code_change && scores.investigation >= INVESTIGATION_FLOOR
        {
            return ClassificationResult::new(
                TicketType::Investigation,
                score_confidence(scores.investigation),
                format!(
                    "Investigation indicators: {}",
                    scores.investigation_matches.join(", ")
                ),
                extracted,
            );
        }

        if scores.code_change >= CODE_CHANGE_FLOOR {
            return ClassificationResult::new(
                TicketType::CodeChange,
                score_confidence(scores.code_change),
                format!(
                    "Code change indicators: {}",
                    scores.code_change_matches.join(", ")
                ),
                extracted,
            );
        }

        ClassificationResult::new(
            TicketType::Skip,
            DEFAULT_SKIP_CONFIDENCE,
            "No clear action indicators found",
            extracted,
        )
    }

    /// Compute both weighted scores for `text`.
    pub fn score(&self, text: &str, extracted: &ExtractedData) -> Scores {
        let investigation_matches = find_matching(text, self.tables.investigation);
        let code_change_matches = find_matching(text, self.tables.code_change);

        let mut investigation = KEYWORD_WEIGHT * investigation_matches.len() as i32;
        if extracted.has_urls() {
            investigation += URL_BONUS;
        }

        let mut code_change = KEYWORD_WEIGHT * code_change_matches.len() as i32;
        if extracted.has_file_refs() {
            code_change += FILE_REF_BONUS;
        }
        if extracted.has_function_refs() {
            code_change += FUNCTION_REF_BONUS;
        }

        Scores {
            investigation,
            code_change,
            investigation_matches,
            code_change_matches,
        }
    }
}

/// Join summary, description and (optional) comments the way every
/// component sees the ticket.
pub fn ticket_text(summary: &str, description: &str, comments: &str) -> String {
    if comments.is_empty() {
        format!("{summary}\n{description}")
    } else {
        format!("{summary}\n{description}\n{comments}")
    }
}

fn score_confidence(score: i32) -> f64 {
    (f64::from(score) / CONFIDENCE_SCALE).min(1.0)
}

/// Classify with the canonical keyword tables.
pub fn classify(summary: &str, description: &str) -> ClassificationResult {
    TicketClassifier::default().classify(summary, description)
}
