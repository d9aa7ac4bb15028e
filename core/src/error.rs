use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the search core.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Io error reading `{}`: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SearchError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        SearchError::InvalidArgument(msg.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SearchError::Io { path: path.into(), source }
    }
}

pub type Result<T, E = SearchError> = std::result::Result<T, E>;
