//! Classification, eligibility and file-mapping records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::signals::ExtractedData;

/// Disposition chosen for a ticket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketType {
    /// Actionable code change.
    CodeChange,

    /// Needs investigation before any change.
    Investigation,

    /// Nothing to act on.
    Skip,
}

impl TicketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketType::CodeChange => "CODE_CHANGE",
            TicketType::Investigation => "INVESTIGATION",
            TicketType::Skip => "SKIP",
        }
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying one ticket.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClassificationResult {
    /// Winning disposition.
    #[serde(rename = "type")]
    pub ticket_type: TicketType,

    /// Confidence in the disposition, always in `[0, 1]`.
    pub confidence: f64,

    /// Human-readable explanation.
    pub reason: String,

    /// Signals extracted from the ticket text.
    pub extracted_data: ExtractedData,

    /// Type-specific enrichment, attached by the ticket analyzer.
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub details: Option<TypeDetails>,
}

impl ClassificationResult {
    pub fn new(
        ticket_type: TicketType,
        confidence: f64,
        reason: impl Into<String>,
        extracted_data: ExtractedData,
    ) -> Self {
        Self {
            ticket_type,
            confidence: confidence.clamp(0.0, 1.0),
            reason: reason.into(),
            extracted_data,
            details: None,
        }
    }

    /// Whether the attached details (if any) belong to this result's type.
    pub fn details_match_type(&self) -> bool {
        match &self.details {
            None => true,
            Some(TypeDetails::CodeChange(_)) => self.ticket_type == TicketType::CodeChange,
            Some(TypeDetails::Investigation(_)) => self.ticket_type == TicketType::Investigation,
        }
    }

    pub fn code_change_details(&self) -> Option<&CodeChangeDetails> {
        match &self.details {
            Some(TypeDetails::CodeChange(d)) => Some(d),
            _ => None,
        }
    }

    pub fn investigation_details(&self) -> Option<&InvestigationDetails> {
        match &self.details {
            Some(TypeDetails::Investigation(d)) => Some(d),
            _ => None,
        }
    }
}

/// Extension fields, one variant per enriched disposition.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum TypeDetails {
    CodeChange(CodeChangeDetails),
    Investigation(InvestigationDetails),
}

/// Enrichment for CODE_CHANGE tickets.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CodeChangeDetails {
    pub suggested_files: Vec<String>,
    pub file_mappings: Vec<FileMapping>,
    pub ralph_eligibility: EligibilityResult,
}

/// Enrichment for INVESTIGATION tickets.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InvestigationDetails {
    pub suggested_indices: Vec<String>,
}

/// Whether a CODE_CHANGE ticket can be handed to an unsupervised agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EligibilityResult {
    pub eligible: bool,
    pub confidence: f64,
    pub criteria_met: Vec<String>,
    pub disqualifiers: Vec<String>,
    pub reason: String,
}

/// One candidate file produced by the code mapper.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileMapping {
    pub file: String,
    pub keywords_matched: Vec<String>,
    pub confidence: f64,
}
