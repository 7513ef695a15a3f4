use thiserror::Error;

/// Structural problems found in coverage data.
#[derive(Debug, Error)]
pub enum CoverageError {
    #[error("invalid coverage json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{path}: statement hit `{index}` has no entry in statementMap")]
    MissingStatement { path: String, index: u32 },

    #[error("{path}: function hit `{index}` has no entry in fnMap")]
    MissingFunction { path: String, index: u32 },

    #[error("{path}: branch hit `{index}` has no entry in branchMap")]
    MissingBranch { path: String, index: u32 },

    #[error("{path}: branch `{index}` declares {expected} locations but has {actual} hit counts")]
    BranchArity {
        path: String,
        index: u32,
        expected: usize,
        actual: usize,
    },
}
