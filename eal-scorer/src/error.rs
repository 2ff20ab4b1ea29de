use std::path::PathBuf;

use crate::config::ConfigError;

/// Errors that abort a scoring run
#[derive(Debug, thiserror::Error)]
pub enum ScorerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] kbp_events::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reference linking missing for {0}")]
    MissingReferenceLinking(String),

    #[error("system linking missing for {0}")]
    MissingSystemLinking(String),

    /// An equivalence class with neither system nor gold members
    #[error("alignment failure in {doc_id}: class {class} has no responses on either side")]
    AlignmentFailure { doc_id: String, class: String },

    #[error("two observers share the name {0}")]
    DuplicateObserver(String),

    #[error("unknown observer: {0}")]
    UnknownObserver(String),

    #[error("exception while processing {doc_id}: {source}")]
    Document {
        doc_id: String,
        #[source]
        source: Box<ScorerError>,
    },

    #[error("exception while processing system {path}: {source}")]
    System {
        path: PathBuf,
        #[source]
        source: Box<ScorerError>,
    },
}

impl ScorerError {
    pub fn in_document(doc_id: impl Into<String>, source: ScorerError) -> Self {
        ScorerError::Document {
            doc_id: doc_id.into(),
            source: Box::new(source),
        }
    }

    pub fn in_system(path: impl Into<PathBuf>, source: ScorerError) -> Self {
        ScorerError::System {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScorerError>;
