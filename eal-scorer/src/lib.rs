//! Scorer for KBP event argument extraction and linking
//!
//! System responses and gold judgments are grouped into equivalence classes
//! (event type, role, normalized filler, realis) and aligned class by class.
//! Two consumers sit on top of the alignment:
//!
//! - the observer protocol ([`observers`]), driven by
//!   [`alignment::AlignmentDriver`], for diagnostic counts and logs
//! - the EAL scorer ([`analysis::EalScorer`]), which combines an argument
//!   score with a B-cubed linking score as `(1 - lambda) * arg + lambda * link`
//!   and aggregates a corpus by summing raw scores and normalizers
//!
//! # Example
//!
//! ```rust
//! use eal_scorer::prelude::*;
//! use kbp_events::{
//!     AnswerKey, ArgumentOutput, AssessedResponse, CharOffsetSpan, KbpString, Realis, Response,
//!     ResponseAssessment, ResponseLinking, ResponseSet, ScoredResponse, ScoringData,
//! };
//!
//! let response = Response::new(
//!     "doc1",
//!     "Life.Die",
//!     "Victim",
//!     KbpString::new("the mayor", 50, 58),
//!     CharOffsetSpan::new(54, 58),
//!     Realis::Actual,
//! );
//! let key = AnswerKey::new(
//!     "doc1",
//!     vec![AssessedResponse::new(
//!         response.clone(),
//!         ResponseAssessment::correct(Realis::Actual),
//!     )],
//!     Vec::new(),
//!     Default::default(),
//! );
//! let output = ArgumentOutput::new("doc1", vec![ScoredResponse::new(response.clone(), 0.9)]);
//! let linking = || {
//!     ResponseLinking::new("doc1", vec![ResponseSet::from([response.clone()])], Vec::new())
//! };
//!
//! let data = ScoringData::new(key, output, linking().unwrap(), linking().unwrap());
//! let result = EalScorer::new(0.25, 0.25).score(&data);
//! assert_eq!(result.scaled_score(), 1.0);
//! ```

pub mod alignment;
pub mod analysis;
pub mod config;
pub mod error;
pub mod observers;
pub mod reporting;
pub mod runner;

pub use config::ScorerConfig;
pub use error::{Result, ScorerError};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::alignment::{
        AlignmentCase, AlignmentDriver, AnswerKeyAnswerSource, AnswerSource,
        ByJustificationLocation, EntityNormalizer, OnlyMostSpecificTemporal,
        SystemOutputAnswerSource, TypeRoleFillerRealis,
    };
    pub use crate::analysis::{CorpusAggregate, DocumentResult, EalScorer, LinkingScore};
    pub use crate::config::ScorerConfig;
    pub use crate::error::{Result, ScorerError};
    pub use crate::observers::{
        CorpusObserver, DocumentObserver, Presence, Registered, ScoringObserver,
    };
    pub use crate::reporting::{print_console_report, JsonSummary};
    pub use crate::runner::{load_documents_to_score, run_alignment, EalRunner};
}
