//! Repository target configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::credentials::Credentials;
use crate::error::RepoError;

/// Supported repository backends.
///
/// The set is closed: the publisher dispatches with an exhaustive match,
/// and any other tag is rejected at parse time, before any I/O happens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum RepositoryKind {
    /// OCI registry, pushed via `helm push` with a login/logout session
    #[default]
    Oci,

    /// ChartMuseum-style collection endpoint (POST to /api/charts)
    ChartMuseum,

    /// Generic HTTP object store (PUT of the archive itself)
    Http,
}

impl RepositoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepositoryKind::Oci => "oci",
            RepositoryKind::ChartMuseum => "chartmuseum",
            RepositoryKind::Http => "http",
        }
    }
}

impl fmt::Display for RepositoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepositoryKind {
    type Err = RepoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "oci" => Ok(RepositoryKind::Oci),
            "chartmuseum" => Ok(RepositoryKind::ChartMuseum),
            "http" => Ok(RepositoryKind::Http),
            other => Err(RepoError::UnsupportedKind {
                kind: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for RepositoryKind {
    type Error = RepoError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A publish destination
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryTarget {
    /// Backend kind
    #[serde(rename = "type", default)]
    pub kind: RepositoryKind,

    /// Base address (oci://, http:// or https://)
    #[serde(default)]
    pub url: String,

    /// Username for authentication
    #[serde(default)]
    pub username: Option<String>,

    /// Password for authentication
    #[serde(default)]
    pub password: Option<String>,

    /// Extra path segment between the base URL and the ChartMuseum API
    /// (for servers mounted under a sub-path)
    #[serde(default)]
    pub context_path: Option<String>,

    /// Helm registry config file holding OCI login state
    #[serde(default)]
    pub registry_config: Option<PathBuf>,
}

impl RepositoryTarget {
    pub fn new(kind: RepositoryKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            ..Self::default()
        }
    }

    /// Credentials, when both halves are configured
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some(Credentials::new(username, password)),
            _ => None,
        }
    }

    /// Host portion of an OCI address: scheme stripped, path dropped.
    /// `oci://ghcr.io/myorg/charts` -> `ghcr.io`
    pub fn registry_host(&self) -> &str {
        let stripped = self.url.strip_prefix("oci://").unwrap_or(&self.url);
        stripped.split('/').next().unwrap_or(stripped)
    }

    /// Upload endpoint for a ChartMuseum target:
    /// `{base}[/{contextPath}]/api/charts`
    pub fn chartmuseum_endpoint(&self) -> String {
        let base = self.url.trim_end_matches('/');
        match self.context_path.as_deref().map(|p| p.trim_matches('/')) {
            Some(prefix) if !prefix.is_empty() => format!("{}/{}/api/charts", base, prefix),
            _ => format!("{}/api/charts", base),
        }
    }
}
