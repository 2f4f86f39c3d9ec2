//! Error types for repository publishing

use thiserror::Error;

/// Repository publishing errors
#[derive(Debug, Error)]
pub enum RepoError {
    // ============ Configuration Errors ============
    #[error("Unsupported repository type: {kind}")]
    UnsupportedKind { kind: String },

    #[error("Invalid repository URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    // ============ Registry Errors ============
    #[error("Registry login failed: {message}")]
    LoginFailed { message: String },

    #[error("Chart push failed: {message}")]
    PushFailed { message: String },

    // ============ Upload Errors ============
    #[error("Upload failed with status {status}: {body}")]
    UploadFailed { status: u16, body: String },

    // ============ Network Errors ============
    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Request timed out: {message}")]
    Timeout { message: String },

    // ============ IO Errors ============
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for repository operations
pub type Result<T> = std::result::Result<T, RepoError>;

impl From<reqwest::Error> for RepoError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RepoError::Timeout {
                message: e.to_string(),
            }
        } else if e.is_connect() {
            RepoError::NetworkError {
                message: format!("Connection failed: {}", e),
            }
        } else {
            RepoError::NetworkError {
                message: e.to_string(),
            }
        }
    }
}
