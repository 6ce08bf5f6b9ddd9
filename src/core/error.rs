use thiserror::Error;

use crate::core::Diagnostic;
use crate::plan::Statement;

#[derive(Debug, Error, PartialEq)]
pub enum MasonError {
    #[error("Cannot parse config: {0}")]
    ConfigParsingError(String),
    #[error("Malformed comment metadata: {0}")]
    MalformedMetadata(String),
    #[error("Validation failed with {} diagnostic(s)", .0.len())]
    ValidationFailed(Vec<Diagnostic>),
    #[error("{operation} failed: {message}")]
    ExecutionFailed {
        operation: String,
        message: String,
        /// Statements that completed before the failing one. DDL is not
        /// transactional, so these stay applied.
        applied: Vec<Statement>,
    },
    #[error("Client error: {0}")]
    ClientError(String),
    #[error("{0} not found")]
    NotFound(String),
}

impl From<clickhouse::error::Error> for MasonError {
    fn from(err: clickhouse::error::Error) -> Self {
        MasonError::ClientError(err.to_string())
    }
}

impl From<serde_json::Error> for MasonError {
    fn from(err: serde_json::Error) -> Self {
        MasonError::MalformedMetadata(err.to_string())
    }
}
