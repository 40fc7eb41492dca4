//! Error types for RepoGrade core.

use std::{error::Error, fmt};

/// Error type for RepoGrade core operations.
#[derive(Debug)]
pub enum RepoGradeError {
    /// Upstream data did not have the shape required at the boundary.
    InvalidInput(String),
    /// JSON encoding or decoding failed.
    Json(serde_json::Error),
}

impl fmt::Display for RepoGradeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::Json(err) => write!(f, "json error: {err}"),
        }
    }
}

impl Error for RepoGradeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::InvalidInput(_) => None,
        }
    }
}

impl From<serde_json::Error> for RepoGradeError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Convenience result type for RepoGrade core.
pub type Result<T> = std::result::Result<T, RepoGradeError>;
