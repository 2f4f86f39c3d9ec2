//! Chart.yaml model and validation

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};

/// File name of the chart manifest within a chart directory
pub const CHART_FILE: &str = "Chart.yaml";

/// apiVersion values accepted by the publish pipeline
pub const ACCEPTED_API_VERSIONS: &[&str] = &["v1", "v2"];

/// Parsed contents of a Chart.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    /// Chart API version (v1 or v2)
    pub api_version: String,

    /// Chart name (required)
    pub name: String,

    /// Chart version (required, SemVer)
    pub version: String,

    /// Application version
    #[serde(default)]
    pub app_version: Option<String>,

    /// Description
    #[serde(default)]
    pub description: Option<String>,

    /// Chart type (application or library)
    #[serde(default, rename = "type")]
    pub chart_type: Option<String>,

    /// Keywords
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Home URL
    #[serde(default)]
    pub home: Option<String>,

    /// Source URLs
    #[serde(default)]
    pub sources: Vec<String>,

    /// Dependencies
    #[serde(default)]
    pub dependencies: Vec<ChartDependency>,

    /// Maintainers
    #[serde(default)]
    pub maintainers: Vec<Maintainer>,

    /// Icon URL
    #[serde(default)]
    pub icon: Option<String>,

    /// Whether the chart is deprecated
    #[serde(default)]
    pub deprecated: bool,

    /// Kubernetes version constraint
    #[serde(default)]
    pub kube_version: Option<String>,
}

/// A chart dependency declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDependency {
    pub name: String,
    pub version: String,
    pub repository: String,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub alias: Option<String>,
}

/// Maintainer information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Maintainer {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Chart {
    /// Load and parse `Chart.yaml` from a chart directory
    pub fn load(chart_dir: &Path) -> Result<Self> {
        let path = chart_file(chart_dir);
        if !path.exists() {
            return Err(CoreError::ChartNotFound {
                path: chart_dir.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(&path)?;
        let chart: Self = serde_yaml::from_str(&content)?;
        Ok(chart)
    }

    /// Check the invariants the publish pipeline relies on
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(CoreError::MissingField {
                field: "name".to_string(),
            });
        }
        if self.version.is_empty() {
            return Err(CoreError::MissingField {
                field: "version".to_string(),
            });
        }
        if self.api_version.is_empty() {
            return Err(CoreError::MissingField {
                field: "apiVersion".to_string(),
            });
        }
        if !ACCEPTED_API_VERSIONS.contains(&self.api_version.as_str()) {
            return Err(CoreError::UnsupportedApiVersion {
                value: self.api_version.clone(),
            });
        }
        Ok(())
    }

    /// Chart version parsed as SemVer (Helm rejects non-SemVer versions at
    /// package time, so surfacing this early is useful for preflight checks)
    pub fn parsed_version(&self) -> Result<semver::Version> {
        Ok(semver::Version::parse(&self.version)?)
    }

    /// Whether the chart declares any dependencies
    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }
}

/// Path of the manifest file within a chart directory
pub fn chart_file(chart_dir: &Path) -> PathBuf {
    chart_dir.join(CHART_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"apiVersion: v2
name: myapp
version: 1.2.3
appVersion: "1.2.3"
description: A demo chart
dependencies:
  - name: postgresql
    version: 12.x.x
    repository: https://charts.bitnami.com/bitnami
    condition: postgresql.enabled
maintainers:
  - name: Jo
    email: jo@example.com
"#;

    #[test]
    fn test_parse_chart() {
        let chart: Chart = serde_yaml::from_str(SAMPLE).unwrap();
        assert_eq!(chart.api_version, "v2");
        assert_eq!(chart.name, "myapp");
        assert_eq!(chart.version, "1.2.3");
        assert_eq!(chart.app_version.as_deref(), Some("1.2.3"));
        assert_eq!(chart.dependencies.len(), 1);
        assert_eq!(chart.dependencies[0].name, "postgresql");
        assert!(chart.has_dependencies());
    }

    #[test]
    fn test_validate_ok() {
        let chart: Chart = serde_yaml::from_str(SAMPLE).unwrap();
        chart.validate().unwrap();
        assert_eq!(chart.parsed_version().unwrap(), semver::Version::new(1, 2, 3));
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let mut chart: Chart = serde_yaml::from_str(SAMPLE).unwrap();
        chart.name = String::new();
        let err = chart.validate().unwrap_err();
        assert!(matches!(err, CoreError::MissingField { field } if field == "name"));
    }

    #[test]
    fn test_validate_rejects_unknown_api_version() {
        let mut chart: Chart = serde_yaml::from_str(SAMPLE).unwrap();
        chart.api_version = "v3".to_string();
        let err = chart.validate().unwrap_err();
        assert!(err.to_string().contains("v3"));
    }

    #[test]
    fn test_load_missing_chart() {
        let dir = tempfile::tempdir().unwrap();
        let err = Chart::load(dir.path()).unwrap_err();
        assert!(matches!(err, CoreError::ChartNotFound { .. }));
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CHART_FILE), SAMPLE).unwrap();
        let chart = Chart::load(dir.path()).unwrap();
        assert_eq!(chart.name, "myapp");
    }
}
