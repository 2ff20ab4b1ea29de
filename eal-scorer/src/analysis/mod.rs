//! Event argument and linking scores

pub mod aggregate;
pub mod document;
pub mod linking;

pub use aggregate::{CorpusAggregate, RawSums};
pub use document::{ArgumentTally, DocumentResult, EalScorer};
pub use linking::{b_cubed, LinkingScore};
