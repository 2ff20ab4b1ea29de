//! KBP event argument data model
//!
//! Responses, assessments, answer keys, system argument output and response
//! linkings, plus the document stores they are read from.
//!
//! # Example
//!
//! ```rust
//! use kbp_events::{
//!     AssessedResponse, CharOffsetSpan, KbpString, Realis, Response, ResponseAssessment,
//! };
//!
//! let response = Response::new(
//!     "doc1",
//!     "Conflict.Attack",
//!     "Attacker",
//!     KbpString::new("rebels", 10, 15),
//!     CharOffsetSpan::new(10, 15),
//!     Realis::Actual,
//! )
//! .with_predicate_justification(CharOffsetSpan::new(0, 40));
//!
//! let judged = AssessedResponse::new(response, ResponseAssessment::correct(Realis::Actual));
//! assert!(judged.is_completely_correct());
//! ```

mod answer_key;
mod assessment;
mod error;
mod linking;
mod linker;
mod response;
mod span;
mod store;
mod timex;

pub use answer_key::{AnswerKey, ArgumentOutput, CorefAnnotation};
pub use assessment::{AssessedResponse, Correctness, FieldAssessment, ResponseAssessment};
pub use error::{Error, Result};
pub use linker::SameEventTypeLinker;
pub use linking::{ResponseLinking, ResponseSet, ScoringData};
pub use response::{Realis, Response, ScoredResponse};
pub use span::{CharOffsetSpan, KbpString};
pub use store::{
    AnnotationStore, ArgumentStore, JsonAnnotationStore, JsonArgumentStore, JsonLinkingStore,
    LinkingStore,
};
pub use timex::TimexDate;
