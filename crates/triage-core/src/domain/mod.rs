//! Domain records for ticket triage.
//!
//! - `ClassificationResult`: disposition plus type-specific enrichment
//! - `EligibilityResult`: automation gate outcome
//! - `FileMapping`: code mapper suggestion
//! - `Comment`: raw tracker comment

pub mod comment;
pub mod error;
pub mod ticket;

pub use comment::{parse_comments, Comment, CommentAuthor};
pub use error::{Result, TriageError};
pub use ticket::{
    ClassificationResult, CodeChangeDetails, EligibilityResult, FileMapping,
    InvestigationDetails, TicketType, TypeDetails,
};
