//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Chart.yaml not found in {path}")]
    ChartNotFound { path: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("apiVersion must be v1 or v2, got: {value}")]
    UnsupportedApiVersion { value: String },

    #[error("{field} field not found in Chart.yaml")]
    FieldNotFound { field: String },

    #[error("Failed to parse Chart.yaml: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Invalid version: {0}")]
    InvalidVersion(#[from] semver::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
