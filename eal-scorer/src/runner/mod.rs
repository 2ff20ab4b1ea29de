//! Scoring runs over stores on disk

pub mod align;
pub mod documents;
pub mod eal;

pub use align::run_alignment;
pub use documents::{load_documents_to_score, parse_document_list};
pub use eal::{EalRunner, SystemStores};
