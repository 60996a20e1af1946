//! Error type for knowledge file access.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, KnowledgeError>;

#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// Reading, writing or renaming the backing file failed.
    #[error("knowledge file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but is not a flat JSON object.
    #[error("knowledge file {path:?} is not a JSON object: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The mapping could not be serialized.
    #[error("failed to serialize knowledge base: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl KnowledgeError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        KnowledgeError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
