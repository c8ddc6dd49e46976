//! Ticket Triage Core Library
//!
//! Heuristic classification of issue-tracker tickets into CODE_CHANGE,
//! INVESTIGATION or SKIP, eligibility scoring for unsupervised automation,
//! code/index mapping and comment follow-up analysis.
//!
//! The engine modules are pure and never fail; configuration loading is the
//! only fallible part and returns [`TriageError`].

pub mod analyzer;
pub mod classifier;
pub mod code_map;
pub mod comments;
pub mod config;
pub mod document;
pub mod domain;
pub mod eligibility;
pub mod index;
pub mod keywords;
pub mod obs;
pub mod signals;
pub mod telemetry;

pub use analyzer::TicketAnalyzer;
pub use classifier::{classify, ticket_text, Scores, TicketClassifier};
pub use code_map::{CodeMapper, CodeMappingRule, DEFAULT_RULES};
pub use comments::{format_for_analysis, CommentThread, FollowupContext};
pub use config::{
    find_repo_root, load_config, load_config_from, CodeMappingConfig, GithubConfig, JiraConfig,
    TriageConfig, VerificationConfig,
};
pub use document::flatten;
pub use domain::{
    parse_comments, ClassificationResult, CodeChangeDetails, Comment, CommentAuthor,
    EligibilityResult, FileMapping, InvestigationDetails, Result, TicketType, TriageError,
    TypeDetails,
};
pub use eligibility::{assess_eligibility, looks_testable, EligibilityScorer, TicketParts};
pub use index::IndexResolver;
pub use keywords::{count_matching, find_matching, KeywordTables};
pub use obs::{
    emit_config_loaded, emit_eligibility_assessed, emit_ticket_classified,
    emit_verification_stage_finished, emit_verification_timeout, TicketSpan,
};
pub use signals::{extract, ExtractedData};
pub use telemetry::init_tracing;

/// Triage version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
