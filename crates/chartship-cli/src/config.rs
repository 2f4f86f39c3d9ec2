//! Publish configuration
//!
//! Settings come from an optional `.chartship.yaml` next to the chart,
//! overridden by command-line flags. Defaults match a cautious CI run:
//! lint and template validation on, dependency update and build on,
//! signing off.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use chartship_repo::RepositoryTarget;

use crate::error::{CliError, Result};

/// Default configuration file name, looked up inside the chart directory
pub const CONFIG_FILE: &str = ".chartship.yaml";

/// Full configuration of a publish run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PublishConfig {
    /// Where to publish
    pub repository: RepositoryTarget,

    /// Version rewriting behavior
    pub version: VersionConfig,

    /// Dependency resolution behavior
    pub dependencies: DependencyConfig,

    /// Run `helm lint` before packaging
    pub lint: bool,

    /// Treat lint warnings as errors
    pub lint_strict: bool,

    /// Render templates as a validation step
    pub template_validate: bool,

    /// Kubernetes version passed to template rendering
    pub kube_version: Option<String>,

    /// API groups passed to template rendering
    pub api_versions: Vec<String>,

    /// Sign the packaged chart
    pub sign: bool,

    /// Key identifier for signing
    pub sign_key: Option<String>,

    /// Keyring holding the signing key
    pub keyring: Option<PathBuf>,

    /// File containing the signing passphrase
    pub passphrase_file: Option<PathBuf>,

    /// Directory the packaged archive is written to
    pub output_dir: PathBuf,

    /// Log intended actions without performing them
    pub dry_run: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            repository: RepositoryTarget::default(),
            version: VersionConfig::default(),
            dependencies: DependencyConfig::default(),
            lint: true,
            lint_strict: false,
            template_validate: true,
            kube_version: None,
            api_versions: Vec::new(),
            sign: false,
            sign_key: None,
            keyring: None,
            passphrase_file: None,
            output_dir: PathBuf::from(".helm-packages"),
            dry_run: false,
        }
    }
}

impl PublishConfig {
    /// Load from an explicit file, or from `.chartship.yaml` in the chart
    /// directory when present; defaults otherwise.
    pub fn load(explicit: Option<&Path>, chart_dir: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let default = chart_dir.join(CONFIG_FILE);
                if default.exists() {
                    Self::load_from(&default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_yaml::from_str(&content).map_err(|e| {
            CliError::config(format!("invalid configuration in {}: {}", path.display(), e))
        })
    }
}

/// Version rewriting behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VersionConfig {
    /// Rewrite the chart's `version:` field to the release version
    pub update_chart: bool,

    /// Also rewrite `appVersion:`
    pub update_app_version: bool,

    /// Template for the appVersion value; `{version}` expands to the
    /// release version. Defaults to the release version itself.
    pub app_version_format: Option<String>,
}

impl Default for VersionConfig {
    fn default() -> Self {
        Self {
            update_chart: true,
            update_app_version: true,
            app_version_format: None,
        }
    }
}

impl VersionConfig {
    /// The appVersion value to write for a given release version, if any
    pub fn app_version_for(&self, version: &str) -> Option<String> {
        if !self.update_app_version {
            return None;
        }
        match &self.app_version_format {
            Some(format) => Some(format.replace("{version}", version)),
            None => Some(version.to_string()),
        }
    }
}

/// Dependency resolution behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DependencyConfig {
    /// Run `helm dependency update`
    pub update: bool,

    /// Run `helm dependency build`
    pub build: bool,
}

impl Default for DependencyConfig {
    fn default() -> Self {
        Self {
            update: true,
            build: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartship_repo::RepositoryKind;

    #[test]
    fn test_defaults() {
        let config = PublishConfig::default();
        assert!(config.lint);
        assert!(!config.lint_strict);
        assert!(config.template_validate);
        assert!(config.dependencies.update);
        assert!(config.dependencies.build);
        assert!(!config.sign);
        assert!(!config.dry_run);
        assert_eq!(config.output_dir, PathBuf::from(".helm-packages"));
        assert_eq!(config.repository.kind, RepositoryKind::Oci);
    }

    #[test]
    fn test_load_from_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            "repository:\n  type: chartmuseum\n  url: https://charts.example.com\nlint: false\nversion:\n  appVersionFormat: \"v{version}\"\n",
        )
        .unwrap();

        let config = PublishConfig::load(None, dir.path()).unwrap();
        assert_eq!(config.repository.kind, RepositoryKind::ChartMuseum);
        assert_eq!(config.repository.url, "https://charts.example.com");
        assert!(!config.lint);
        // Unspecified fields keep their defaults
        assert!(config.template_validate);
        assert_eq!(
            config.version.app_version_for("1.2.3").as_deref(),
            Some("v1.2.3")
        );
    }

    #[test]
    fn test_missing_default_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PublishConfig::load(None, dir.path()).unwrap();
        assert!(config.repository.url.is_empty());
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = PublishConfig::load(Some(&dir.path().join("nope.yaml")), dir.path()).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn test_app_version_disabled() {
        let version = VersionConfig {
            update_app_version: false,
            ..VersionConfig::default()
        };
        assert_eq!(version.app_version_for("1.2.3"), None);
    }
}
