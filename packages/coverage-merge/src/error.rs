use std::{io, path::PathBuf};

use istanbul_oxide::CoverageError;
use thiserror::Error;

pub type MergeResult<T> = Result<T, MergeError>;

/// Every error here aborts the pipeline. Missing producer data is not an
/// error and never reaches this type.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed coverage data in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid coverage data in {}: {source}", path.display())]
    InvalidCoverage {
        path: PathBuf,
        #[source]
        source: CoverageError,
    },

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("invalid exclude pattern: {message}")]
    Pattern { message: String },
}

impl MergeError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// `map_err` adapter attaching the path an I/O operation was working on.
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> MergeError {
        let path = path.into();
        move |source| MergeError::Io { path, source }
    }

    /// Splits istanbul-oxide's error into "not json at all" and "json that is
    /// not coverage data".
    pub fn coverage(path: impl Into<PathBuf>) -> impl FnOnce(CoverageError) -> MergeError {
        let path = path.into();
        move |source| match source {
            CoverageError::Json(source) => MergeError::Parse { path, source },
            source => MergeError::InvalidCoverage { path, source },
        }
    }
}
