//! Parsing of `helm package` output
//!
//! Helm prints the location of the archive it just wrote as a line of
//! free-form text. The phrasing is Helm's, not ours, so the scrape is
//! isolated here: if the marker ever changes, this is the only place that
//! knows about it.

use std::path::PathBuf;

use crate::error::{HelmError, Result};

/// The marker Helm prints before the archive path:
/// `Successfully packaged chart and saved it to: /path/to/chart-1.0.0.tgz`
const SAVED_MARKER: &str = "saved it to:";

/// Extract the packaged archive path from captured `helm package` output.
///
/// Scans line by line and returns the trimmed text after the first marker
/// occurrence. Splitting on the marker substring (not on `:`) keeps paths
/// with embedded colons or spaces intact.
pub fn extract_package_path(output: &str) -> Result<PathBuf> {
    for line in output.lines() {
        if let Some(idx) = line.find(SAVED_MARKER) {
            let path = line[idx + SAVED_MARKER.len()..].trim();
            return Ok(PathBuf::from(path));
        }
    }
    Err(HelmError::PackagePathNotFound {
        output: output.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_path_from_package_output() {
        let output = "Successfully packaged chart and saved it to: /tmp/charts/myapp-1.0.0.tgz\n";
        let path = extract_package_path(output).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/charts/myapp-1.0.0.tgz"));
    }

    #[test]
    fn test_tolerates_spaces_and_colons_in_path() {
        let output = "Successfully packaged chart and saved it to: /a/b c.tgz\n";
        assert_eq!(
            extract_package_path(output).unwrap(),
            PathBuf::from("/a/b c.tgz")
        );

        let output = "Successfully packaged chart and saved it to: C:\\charts\\myapp-1.0.0.tgz\n";
        assert_eq!(
            extract_package_path(output).unwrap(),
            PathBuf::from("C:\\charts\\myapp-1.0.0.tgz")
        );
    }

    #[test]
    fn test_skips_unrelated_lines() {
        let output = "walk.go:74: found symbolic link\n\
                      Successfully packaged chart and saved it to: /out/demo-2.0.0.tgz\n";
        assert_eq!(
            extract_package_path(output).unwrap(),
            PathBuf::from("/out/demo-2.0.0.tgz")
        );
    }

    #[test]
    fn test_first_marker_line_wins() {
        let output = "saved it to: /first.tgz\nsaved it to: /second.tgz\n";
        assert_eq!(extract_package_path(output).unwrap(), PathBuf::from("/first.tgz"));
    }

    #[test]
    fn test_fails_without_marker() {
        let err = extract_package_path("nothing useful here\n").unwrap_err();
        assert!(matches!(err, HelmError::PackagePathNotFound { .. }));

        assert!(extract_package_path("").is_err());
    }
}
