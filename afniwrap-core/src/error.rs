use std::path::PathBuf;

use thiserror::Error;

/// Custom error types for afniwrap
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing mandatory parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Parameter '{param}' requires '{requires}' to also be set")]
    UnsatisfiedDependency {
        param: &'static str,
        requires: &'static str,
    },

    #[error("Parameter '{param}' has {actual} element(s), expected {expected}")]
    LengthMismatch {
        param: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid value '{value}' for parameter '{param}' (allowed: {allowed})")]
    InvalidValue {
        param: &'static str,
        value: String,
        allowed: &'static str,
    },

    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Required external tool not found: {0}")]
    DependencyNotFound(String),

    #[error("Failed to start command '{program}': {source}")]
    CommandStart {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{program}' failed with status {status}")]
    CommandFailed { program: String, status: String },

    #[error("Unexpected error: {0}")]
    Other(String),
}

/// Result type for afniwrap operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;
