//! Alignment of system responses with gold judgments
//!
//! Responses of a document are grouped into [`TypeRoleFillerRealis`] classes
//! on both the gold and the system side, then visited in
//! [`ByJustificationLocation`] order by the [`AlignmentDriver`].

mod answer_source;
mod classes;
mod driver;
mod normalizer;
mod ordering;
mod temporal;

pub use answer_source::{AnswerKeyAnswerSource, AnswerSource, SystemOutputAnswerSource};
pub use classes::{group_by_class, TypeRoleFillerRealis};
pub use driver::{
    align_class, happy_answerables_path, Alignment, AlignmentCase, AlignmentDriver, AlignmentReport,
};
pub use normalizer::EntityNormalizer;
pub use ordering::ByJustificationLocation;
pub use temporal::{OnlyMostSpecificTemporal, TEMPORAL_ROLES};
