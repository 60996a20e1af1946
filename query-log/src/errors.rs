use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueryLogError>;

#[derive(Debug, Error)]
pub enum QueryLogError {
    #[error("query log {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize log record: {0}")]
    Serialize(#[from] serde_json::Error),
}
