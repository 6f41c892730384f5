//! Error type shared by every fallible computation in the crate.
//!
//! Invariant computations never panic on degenerate input: they return
//! an [`Error`] and the aggregation layer decides, through
//! [`FailurePolicy`](crate::config::FailurePolicy), whether to record a
//! NaN sentinel or abort the run.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("point cloud is empty")]
    EmptyPointCloud,

    #[error("row {row} has {found} coordinates, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("non-finite value in {context}")]
    NonFinite { context: String },

    #[error("matrix is {rows}x{cols}, expected a square matrix")]
    NonSquare { rows: usize, cols: usize },

    #[error("shape mismatch in {operation}: {left:?} vs {right:?}")]
    ShapeMismatch {
        operation: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("unknown structure type `{0}`")]
    UnknownStructure(String),

    #[error("unknown degeneration rule `{0}`")]
    UnknownDegeneration(String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("polynomial {0} is reducible over Q")]
    Reducible(String),

    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("tracing subscriber: {0}")]
    Tracing(String),
}

impl Error {
    pub fn non_finite(context: impl Into<String>) -> Self {
        Error::NonFinite {
            context: context.into(),
        }
    }

    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
