//! Error types for Helm CLI invocations

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HelmError {
    #[error("helm not found in PATH")]
    HelmNotFound,

    #[error("helm {command} failed: {message}")]
    CommandFailed { command: String, message: String },

    #[error("could not determine package path from output: {output}")]
    PackagePathNotFound { output: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HelmError>;
