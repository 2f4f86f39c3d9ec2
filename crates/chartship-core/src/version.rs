//! Format-preserving version updates for Chart.yaml
//!
//! Version bumps are textual, not structural: the patcher rewrites the
//! `version:` (and optionally `appVersion:`) line in place and leaves
//! every other byte of the document alone, so comments, field order, and
//! indentation survive. Parsing into a YAML tree and reserializing would
//! drop all of that.

use regex::{NoExpand, Regex};
use std::path::Path;

use crate::chart::chart_file;
use crate::error::{CoreError, Result};

/// Rewrite the version fields of a raw Chart.yaml document.
///
/// The first `version:` line is replaced with `version: <version>`. When
/// `app_version` is given, an existing `appVersion:` line is replaced with
/// a quoted value, or a new quoted line is inserted directly after the
/// version line. Each pattern is applied to its first match only; a
/// document that declares a field twice keeps its later duplicates as-is.
///
/// Fails with [`CoreError::FieldNotFound`] when no `version:` line exists.
pub fn patch_versions(content: &str, version: &str, app_version: Option<&str>) -> Result<String> {
    let version_re = Regex::new(r"(?m)^version:\s*.+$").expect("valid regex");
    if !version_re.is_match(content) {
        return Err(CoreError::FieldNotFound {
            field: "version".to_string(),
        });
    }

    let mut updated = version_re
        .replace(content, NoExpand(&format!("version: {version}")))
        .into_owned();

    if let Some(app_version) = app_version {
        let app_re = Regex::new(r"(?m)^appVersion:\s*.+$").expect("valid regex");
        let quoted = format!("appVersion: \"{app_version}\"");
        if app_re.is_match(&updated) {
            updated = app_re.replace(&updated, NoExpand(&quoted)).into_owned();
        } else {
            // No appVersion declared yet: insert one right after the version line
            let combined = format!("version: {version}\n{quoted}");
            updated = version_re.replace(&updated, NoExpand(&combined)).into_owned();
        }
    }

    Ok(updated)
}

/// Apply [`patch_versions`] to the Chart.yaml inside `chart_dir`, in place.
pub fn update_chart_file(chart_dir: &Path, version: &str, app_version: Option<&str>) -> Result<()> {
    let path = chart_file(chart_dir);
    if !path.exists() {
        return Err(CoreError::ChartNotFound {
            path: chart_dir.display().to_string(),
        });
    }

    let content = std::fs::read_to_string(&path)?;
    let updated = patch_versions(&content, version, app_version)?;
    std::fs::write(&path, updated)?;
    Ok(())
}
