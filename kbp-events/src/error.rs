use std::path::PathBuf;

/// Errors raised while reading, writing or validating KBP event data
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("store directory does not exist: {0}")]
    StoreNotFound(PathBuf),

    #[error("document {doc_id} not found in store {store}")]
    MissingDocument { store: PathBuf, doc_id: String },

    #[error("{path} holds document {found}, expected {expected}")]
    DocIdMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    #[error("response {response} appears in more than one linking cluster of {doc_id}")]
    OverlappingLinking { doc_id: String, response: String },

    #[error("linking for {doc_id} references response {response} which is not in its source")]
    ForeignResponse { doc_id: String, response: String },

    #[error("invalid TIMEX date: {0}")]
    InvalidDate(String),
}

pub type Result<T> = std::result::Result<T, Error>;
