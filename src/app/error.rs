use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeHashError {
    #[error("Base path {0} is not an existing directory")]
    BaseNotDirectory(PathBuf),
    #[error("Input {0} does not exist")]
    InputNotFound(PathBuf),
    #[error("Failed to read input list {0}: {1}")]
    ReadInputList(PathBuf, #[source] std::io::Error),
    #[error(transparent)]
    Scan(#[from] ScanError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScanError {
    #[error(transparent)]
    Capacity(#[from] CapacityError),
    #[error("Scan was cancelled")]
    Cancelled,
}

/// Inputs the accelerated backend cannot represent without changing the result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CapacityError {
    #[error("Too many extension filters ({count}, limit {limit})")]
    TooManyExtensions { count: usize, limit: usize },
    #[error("Too many ignore filters ({count}, limit {limit})")]
    TooManyIgnores { count: usize, limit: usize },
    #[error("Extension {ext:?} is longer than {limit} bytes")]
    ExtensionTooLong { ext: String, limit: usize },
    #[error("Ignore pattern {pattern:?} is longer than {limit} bytes")]
    IgnoreTooLong { pattern: String, limit: usize },
    #[error("Path {path:?} is longer than {limit} bytes")]
    PathTooLong { path: String, limit: usize },
}
