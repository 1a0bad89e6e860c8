//! Error taxonomy shared by the pipeline, the orchestrator and the Solr client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    /// Blob or index record absent
    #[error("not found: {0}")]
    NotFound(String),

    /// Delete/download resolved a number of records other than one
    #[error("expected exactly one record for id {id}, found {count}")]
    AmbiguousMatch { id: String, count: usize },

    /// Extractor unreachable or returned an unusable result
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),

    /// Engine payload did not have the expected shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Blob write/read/remove failure
    #[error("storage io error: {0}")]
    StorageIo(#[from] std::io::Error),

    /// Engine rejected an add, delete or commit
    #[error("commit failed: {0}")]
    CommitFailed(String),

    /// Transport failure talking to the engine
    #[error("engine request failed: {0}")]
    Engine(String),

    #[error("operation timed out after {0}s")]
    Timeout(u64),
}

impl From<reqwest::Error> for IndexError {
    fn from(e: reqwest::Error) -> Self {
        IndexError::Engine(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IndexError>;
