//! Automation eligibility for CODE_CHANGE tickets.
//!
//! A ticket is eligible when it carries enough machine-checkable success
//! criteria (tests, build/lint gates, concrete files or functions) and no
//! hard disqualifier (vague wording, open design decisions).

use tracing::debug;

use crate::classifier::ticket_text;
use crate::domain::{ClassificationResult, EligibilityResult, TicketType};
use crate::keywords::{any_matching, KeywordTables};

/// Minimum score for eligibility.
pub const ELIGIBILITY_THRESHOLD: i32 = 3;

/// Score that maps to full confidence.
const CONFIDENCE_SCALE: f64 = 6.0;

/// Positive scoring criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    ExistingTests,
    TestRequirements,
    BuildCriteria,
    SpecificFiles,
    SpecificFunctions,
}

impl Criterion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Criterion::ExistingTests => "existing_tests",
            Criterion::TestRequirements => "test_requirements",
            Criterion::BuildCriteria => "build_criteria",
            Criterion::SpecificFiles => "specific_files",
            Criterion::SpecificFunctions => "specific_functions",
        }
    }

    pub fn weight(&self) -> i32 {
        match self {
            Criterion::ExistingTests => 3,
            Criterion::TestRequirements | Criterion::BuildCriteria => 2,
            Criterion::SpecificFiles | Criterion::SpecificFunctions => 1,
        }
    }
}

/// Negative scoring signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disqualifier {
    NotCodeChange,
    VagueRequirements,
    RequiresDesignDecisions,
    /// Informational: lowers the score but never blocks on its own.
    NoSpecificScope,
}

impl Disqualifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Disqualifier::NotCodeChange => "not_code_change",
            Disqualifier::VagueRequirements => "vague_requirements",
            Disqualifier::RequiresDesignDecisions => "requires_design_decisions",
            Disqualifier::NoSpecificScope => "no_specific_scope",
        }
    }

    pub fn penalty(&self) -> i32 {
        match self {
            Disqualifier::NotCodeChange => 0,
            Disqualifier::VagueRequirements => 2,
            Disqualifier::RequiresDesignDecisions => 3,
            Disqualifier::NoSpecificScope => 1,
        }
    }

    pub fn is_blocking(&self) -> bool {
        !matches!(self, Disqualifier::NoSpecificScope)
    }
}

/// Raw text parts of a ticket.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicketParts<'a> {
    pub summary: &'a str,
    pub description: &'a str,
    pub comments: &'a str,
}

impl<'a> TicketParts<'a> {
    pub fn new(summary: &'a str, description: &'a str, comments: &'a str) -> Self {
        Self {
            summary,
            description,
            comments,
        }
    }

    pub fn full_text(&self) -> String {
        ticket_text(self.summary, self.description, self.comments)
    }
}

/// Whether a referenced file looks like a test file or sits in a
/// conventional source tree.
pub fn looks_testable(file_ref: &str) -> bool {
    let stem = file_ref.strip_suffix(".py").unwrap_or(file_ref);
    let test_like = stem.contains("test_") || stem.contains("_test") || stem.contains("tests");
    let source_tree =
        file_ref.contains("config/") || file_ref.contains("lib/") || file_ref.contains("src/");
    test_like || source_tree
}

/// Scores tickets for unsupervised automation.
#[derive(Debug, Clone, Copy, Default)]
pub struct EligibilityScorer {
    tables: KeywordTables,
}

impl EligibilityScorer {
    pub fn new(tables: KeywordTables) -> Self {
        Self { tables }
    }

    /// Assess a classified ticket.
    pub fn assess(
        &self,
        parts: &TicketParts<'_>,
        classification: &ClassificationResult,
    ) -> EligibilityResult {
        if classification.ticket_type != TicketType::CodeChange {
            return EligibilityResult {
                eligible: false,
                confidence: 0.0,
                criteria_met: Vec::new(),
                disqualifiers: vec![Disqualifier::NotCodeChange.as_str().to_string()],
                reason: format!("Ticket is {}, not CODE_CHANGE", classification.ticket_type),
            };
        }

        let text = parts.full_text();
        let extracted = &classification.extracted_data;

        let mut criteria = Vec::new();
        let mut disqualifiers = Vec::new();

        if extracted.file_refs.iter().any(|f| looks_testable(f)) {
            criteria.push(Criterion::ExistingTests);
        }
        if any_matching(&text, self.tables.test) {
            criteria.push(Criterion::TestRequirements);
        }
        if any_matching(&text, self.tables.build) {
            criteria.push(Criterion::BuildCriteria);
        }
        if extracted.has_file_refs() {
            criteria.push(Criterion::SpecificFiles);
        }
        if extracted.has_function_refs() {
            criteria.push(Criterion::SpecificFunctions);
        }

        if any_matching(&text, self.tables.vague) {
            disqualifiers.push(Disqualifier::VagueRequirements);
        }
        if any_matching(&text, self.tables.design_decision) {
            disqualifiers.push(Disqualifier::RequiresDesignDecisions);
        }
        if !extracted.has_file_refs() && !extracted.has_function_refs() {
            disqualifiers.push(Disqualifier::NoSpecificScope);
        }

        let score: i32 = criteria.iter().map(Criterion::weight).sum::<i32>()
            - disqualifiers.iter().map(Disqualifier::penalty).sum::<i32>();
        let blocked = disqualifiers.iter().any(Disqualifier::is_blocking);
        let eligible = score >= ELIGIBILITY_THRESHOLD && !blocked;
        let confidence = (f64::from(score) / CONFIDENCE_SCALE).clamp(0.0, 1.0);

        let criteria_met: Vec<String> = criteria.iter().map(|c| c.as_str().to_string()).collect();
        let disqualifiers: Vec<String> =
            disqualifiers.iter().map(|d| d.as_str().to_string()).collect();

        let reason = if eligible {
            format!("Eligible: {}", criteria_met.join(", "))
        } else if !disqualifiers.is_empty() {
            format!("Not eligible: {}", disqualifiers.join(", "))
        } else {
            format!("Insufficient criteria (score {score}, need {ELIGIBILITY_THRESHOLD})")
        };

        debug!(score, eligible, "eligibility scored");

        EligibilityResult {
            eligible,
            confidence,
            criteria_met,
            disqualifiers,
            reason,
        }
    }
}

/// Assess with the canonical keyword tables.
pub fn assess_eligibility(
    parts: &TicketParts<'_>,
    classification: &ClassificationResult,
) -> EligibilityResult {
    EligibilityScorer::default().assess(parts, classification)
}
