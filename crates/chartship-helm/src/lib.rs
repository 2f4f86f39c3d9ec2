//! Chartship Helm - wrapper around the external `helm` binary
//!
//! Chartship never packages, lints, or renders charts itself; all of that
//! is delegated to Helm as a subprocess. This crate owns the argument
//! grammar, streams tool output through for operator visibility, and for
//! `helm package` captures the combined output so the archive path can be
//! recovered from it.
//!
//! Secrets never appear on a command line: registry passwords are written
//! to the child's stdin (`--password-stdin`), and signing passphrases go
//! through `--passphrase-file`. Every child is spawned with
//! `kill_on_drop` so a cancelled publish leaves no orphaned processes.

pub mod error;
pub mod output;

pub use error::{HelmError, Result};
pub use output::extract_package_path;

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Options for signing a packaged chart
#[derive(Debug, Clone, Default)]
pub struct SignOptions {
    /// Keyring holding the signing key
    pub keyring: Option<PathBuf>,
    /// Key identifier to sign with
    pub key: Option<String>,
    /// File containing the key passphrase
    pub passphrase_file: Option<PathBuf>,
}

/// Wrapper around the `helm` binary, scoped to one chart directory
pub struct HelmCli {
    chart_dir: PathBuf,
    program: String,
}

impl HelmCli {
    /// Create a wrapper invoking `helm` from PATH
    pub fn new(chart_dir: impl Into<PathBuf>) -> Self {
        Self::with_program(chart_dir, "helm")
    }

    /// Create a wrapper invoking a specific program (used by tests)
    pub fn with_program(chart_dir: impl Into<PathBuf>, program: impl Into<String>) -> Self {
        Self {
            chart_dir: chart_dir.into(),
            program: program.into(),
        }
    }

    /// The chart directory this wrapper operates on
    pub fn chart_dir(&self) -> &Path {
        &self.chart_dir
    }

    /// Lint the chart
    pub async fn lint(&self, strict: bool) -> Result<()> {
        let mut args = vec!["lint".to_string(), self.chart_arg()];
        if strict {
            args.push("--strict".to_string());
        }
        self.run_passthrough(&args).await
    }

    /// Validate templates by rendering them against a fixed release name.
    /// Rendered output is discarded; only the exit status matters.
    pub async fn template(&self, kube_version: Option<&str>, api_versions: &[String]) -> Result<()> {
        let args = template_args(&self.chart_arg(), kube_version, api_versions);
        tracing::debug!(?args, "invoking helm");
        let status = self
            .command()
            .args(&args)
            .stdout(Stdio::null())
            .status()
            .await
            .map_err(|e| self.launch_error(e))?;
        self.check_status("template", status)
    }

    /// Update chart dependencies
    pub async fn dependency_update(&self) -> Result<()> {
        self.run_passthrough(&[
            "dependency".to_string(),
            "update".to_string(),
            self.chart_arg(),
        ])
        .await
    }

    /// Build chart dependencies from Chart.lock
    pub async fn dependency_build(&self) -> Result<()> {
        self.run_passthrough(&[
            "dependency".to_string(),
            "build".to_string(),
            self.chart_arg(),
        ])
        .await
    }

    /// Package the chart into `output_dir`, optionally signing it.
    ///
    /// Returns the path of the archive Helm reports having written.
    pub async fn package(&self, output_dir: &Path, sign: Option<&SignOptions>) -> Result<PathBuf> {
        let args = package_args(&self.chart_arg(), output_dir, sign);
        tracing::debug!(?args, "invoking helm");
        let out = self
            .command()
            .args(&args)
            .output()
            .await
            .map_err(|e| self.launch_error(e))?;

        let mut combined = String::from_utf8_lossy(&out.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&out.stderr));

        if !out.status.success() {
            return Err(HelmError::CommandFailed {
                command: "package".to_string(),
                message: format!("{}\n{}", out.status, combined.trim()),
            });
        }

        extract_package_path(&combined)
    }

    /// Log in to an OCI registry host.
    ///
    /// The password is written to helm's stdin so it never shows up in a
    /// process listing.
    pub async fn registry_login(
        &self,
        host: &str,
        username: &str,
        password: &str,
        registry_config: Option<&Path>,
    ) -> Result<()> {
        let mut args = vec![
            "registry".to_string(),
            "login".to_string(),
            host.to_string(),
            "--username".to_string(),
            username.to_string(),
            "--password-stdin".to_string(),
        ];
        push_registry_config(&mut args, registry_config);

        tracing::debug!(host, "logging in to registry");
        let mut child = self
            .command()
            .args(&args)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| self.launch_error(e))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(password.as_bytes()).await?;
            // Dropping stdin closes the pipe so helm sees EOF
        }

        let status = child.wait().await?;
        self.check_status("registry login", status)
    }

    /// Log out of an OCI registry host
    pub async fn registry_logout(&self, host: &str, registry_config: Option<&Path>) -> Result<()> {
        let mut args = vec![
            "registry".to_string(),
            "logout".to_string(),
            host.to_string(),
        ];
        push_registry_config(&mut args, registry_config);
        self.run_passthrough(&args).await
    }

    /// Push a packaged chart archive to an OCI remote
    pub async fn push(
        &self,
        archive: &Path,
        remote: &str,
        registry_config: Option<&Path>,
    ) -> Result<()> {
        let mut args = vec![
            "push".to_string(),
            archive.display().to_string(),
            remote.to_string(),
        ];
        push_registry_config(&mut args, registry_config);
        self.run_passthrough(&args).await
    }

    /// Probe the installed Helm version (e.g. `v3.14.0+g...`)
    pub async fn version(&self) -> Result<String> {
        let out = self
            .command()
            .args(["version", "--short"])
            .output()
            .await
            .map_err(|e| self.launch_error(e))?;
        if !out.status.success() {
            return Err(HelmError::CommandFailed {
                command: "version".to_string(),
                message: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.kill_on_drop(true);
        cmd
    }

    fn chart_arg(&self) -> String {
        self.chart_dir.display().to_string()
    }

    /// Run a command with inherited stdio so the operator sees helm's own
    /// output as it happens.
    async fn run_passthrough(&self, args: &[String]) -> Result<()> {
        tracing::debug!(?args, "invoking helm");
        let status = self
            .command()
            .args(args)
            .status()
            .await
            .map_err(|e| self.launch_error(e))?;
        let command = args.first().map(String::as_str).unwrap_or_default();
        self.check_status(command, status)
    }

    fn check_status(&self, command: &str, status: std::process::ExitStatus) -> Result<()> {
        if status.success() {
            Ok(())
        } else {
            Err(HelmError::CommandFailed {
                command: command.to_string(),
                message: status.to_string(),
            })
        }
    }

    fn launch_error(&self, err: std::io::Error) -> HelmError {
        if err.kind() == std::io::ErrorKind::NotFound {
            HelmError::HelmNotFound
        } else {
            HelmError::Io(err)
        }
    }
}

fn template_args(chart: &str, kube_version: Option<&str>, api_versions: &[String]) -> Vec<String> {
    let mut args = vec![
        "template".to_string(),
        "release-name".to_string(),
        chart.to_string(),
    ];
    if let Some(kube_version) = kube_version {
        args.push("--kube-version".to_string());
        args.push(kube_version.to_string());
    }
    for api in api_versions {
        args.push("--api-versions".to_string());
        args.push(api.clone());
    }
    args
}

fn package_args(chart: &str, output_dir: &Path, sign: Option<&SignOptions>) -> Vec<String> {
    let mut args = vec![
        "package".to_string(),
        chart.to_string(),
        "-d".to_string(),
        output_dir.display().to_string(),
    ];
    if let Some(sign) = sign {
        args.push("--sign".to_string());
        if let Some(keyring) = &sign.keyring {
            args.push("--keyring".to_string());
            args.push(keyring.display().to_string());
        }
        if let Some(key) = &sign.key {
            args.push("--key".to_string());
            args.push(key.clone());
        }
        if let Some(passphrase_file) = &sign.passphrase_file {
            args.push("--passphrase-file".to_string());
            args.push(passphrase_file.display().to_string());
        }
    }
    args
}

fn push_registry_config(args: &mut Vec<String>, registry_config: Option<&Path>) {
    if let Some(config) = registry_config {
        args.push("--registry-config".to_string());
        args.push(config.display().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_args() {
        let args = template_args("./chart", Some("1.29.0"), &["batch/v1".to_string()]);
        assert_eq!(
            args,
            vec![
                "template",
                "release-name",
                "./chart",
                "--kube-version",
                "1.29.0",
                "--api-versions",
                "batch/v1",
            ]
        );

        let args = template_args("./chart", None, &[]);
        assert_eq!(args, vec!["template", "release-name", "./chart"]);
    }

    #[test]
    fn test_package_args_without_signing() {
        let args = package_args("./chart", Path::new(".helm-packages"), None);
        assert_eq!(args, vec!["package", "./chart", "-d", ".helm-packages"]);
    }

    #[test]
    fn test_package_args_with_signing() {
        let sign = SignOptions {
            keyring: Some(PathBuf::from("/keys/ring.gpg")),
            key: Some("release-key".to_string()),
            passphrase_file: Some(PathBuf::from("/keys/pass")),
        };
        let args = package_args("./chart", Path::new("out"), Some(&sign));
        assert_eq!(
            args,
            vec![
                "package",
                "./chart",
                "-d",
                "out",
                "--sign",
                "--keyring",
                "/keys/ring.gpg",
                "--key",
                "release-key",
                "--passphrase-file",
                "/keys/pass",
            ]
        );
    }

    #[tokio::test]
    async fn test_passthrough_reports_exit_status() {
        let helm = HelmCli::with_program(".", "false");
        let err = helm.lint(false).await.unwrap_err();
        assert!(matches!(err, HelmError::CommandFailed { command, .. } if command == "lint"));

        let helm = HelmCli::with_program(".", "true");
        helm.lint(true).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_binary_is_reported() {
        let helm = HelmCli::with_program(".", "definitely-not-helm-3f9a");
        let err = helm.dependency_update().await.unwrap_err();
        assert!(matches!(err, HelmError::HelmNotFound));
    }
}
