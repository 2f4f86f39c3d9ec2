//! The publish pipeline
//!
//! Steps run in a fixed order, each gated by configuration: version
//! rewrite, dependency resolution, lint, template validation, packaging,
//! publish. The first failing step is terminal and names itself in the
//! outcome; nothing is rolled back (a Chart.yaml already rewritten stays
//! rewritten if packaging later fails). In dry-run mode every mutating or
//! external action is replaced by a logged intent and the pipeline always
//! advances, so only configuration errors can fail a dry run.

use console::style;
use std::fmt;
use std::path::{Path, PathBuf};

use chartship_core::{Chart, update_chart_file};
use chartship_helm::{HelmCli, SignOptions};
use chartship_repo::Publisher;

use crate::config::PublishConfig;

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStage {
    NotStarted,
    ManifestUpdated,
    DependenciesResolved,
    Linted,
    TemplatesValidated,
    Packaged,
    Published,
    Failed,
}

/// Terminal result of a publish run, handed back to the caller
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    pub success: bool,
    pub message: String,
}

/// A failed step: which one, and why
struct StepFailure {
    step: &'static str,
    message: String,
}

impl StepFailure {
    fn new(step: &'static str, err: impl fmt::Display) -> Self {
        Self {
            step,
            message: err.to_string(),
        }
    }
}

/// Runs one publish cycle for one chart
pub struct PublishPipeline {
    chart_dir: PathBuf,
    config: PublishConfig,
    release_version: Option<String>,
    stage: PublishStage,
}

impl PublishPipeline {
    pub fn new(
        chart_dir: impl Into<PathBuf>,
        config: PublishConfig,
        release_version: Option<String>,
    ) -> Self {
        Self {
            chart_dir: chart_dir.into(),
            config,
            release_version,
            stage: PublishStage::NotStarted,
        }
    }

    /// The stage the pipeline last reached
    pub fn stage(&self) -> PublishStage {
        self.stage
    }

    /// Run the pipeline to its terminal outcome
    pub async fn run(&mut self) -> PublishOutcome {
        match self.execute().await {
            Ok(message) => PublishOutcome {
                success: true,
                message,
            },
            Err(failure) => {
                self.stage = PublishStage::Failed;
                PublishOutcome {
                    success: false,
                    message: format!("{} failed: {}", failure.step, failure.message),
                }
            }
        }
    }

    async fn execute(&mut self) -> Result<String, StepFailure> {
        let chart = Chart::load(&self.chart_dir)
            .and_then(|c| c.validate().map(|_| c))
            .map_err(|e| StepFailure::new("chart validation", e))?;

        if self.config.repository.url.is_empty() {
            return Err(StepFailure::new(
                "configuration",
                "repository URL is required",
            ));
        }

        let dry_run = self.config.dry_run;
        let version = self
            .release_version
            .clone()
            .unwrap_or_else(|| chart.version.clone());

        // Rewrite version fields in Chart.yaml. Without a release version
        // there is nothing to rewrite; the chart is published as declared.
        if self.config.version.update_chart && self.release_version.is_some() {
            let app_version = self.config.version.app_version_for(&version);
            if dry_run {
                self.intend(format!(
                    "update Chart.yaml from version {} to {}",
                    chart.version, version
                ));
            } else {
                self.progress("Updating", "Chart.yaml version fields");
                update_chart_file(&self.chart_dir, &version, app_version.as_deref())
                    .map_err(|e| StepFailure::new("updating Chart.yaml", e))?;
            }
            self.stage = PublishStage::ManifestUpdated;
        }

        let helm = HelmCli::new(&self.chart_dir);

        if self.config.dependencies.update {
            if dry_run {
                self.intend("run helm dependency update");
            } else {
                self.progress("Updating", "chart dependencies");
                helm.dependency_update()
                    .await
                    .map_err(|e| StepFailure::new("dependency update", e))?;
            }
            self.stage = PublishStage::DependenciesResolved;
        }

        if self.config.dependencies.build {
            if dry_run {
                self.intend("run helm dependency build");
            } else {
                self.progress("Building", "chart dependencies");
                helm.dependency_build()
                    .await
                    .map_err(|e| StepFailure::new("dependency build", e))?;
            }
            self.stage = PublishStage::DependenciesResolved;
        }

        if self.config.lint {
            if dry_run {
                self.intend("run helm lint");
            } else {
                self.progress("Linting", "chart");
                helm.lint(self.config.lint_strict)
                    .await
                    .map_err(|e| StepFailure::new("lint", e))?;
            }
            self.stage = PublishStage::Linted;
        }

        if self.config.template_validate {
            if dry_run {
                self.intend("render templates for validation");
            } else {
                self.progress("Validating", "templates");
                helm.template(self.config.kube_version.as_deref(), &self.config.api_versions)
                    .await
                    .map_err(|e| StepFailure::new("template validation", e))?;
            }
            self.stage = PublishStage::TemplatesValidated;
        }

        let archive = if dry_run {
            self.intend(format!(
                "package chart into {}",
                self.config.output_dir.display()
            ));
            self.config
                .output_dir
                .join(format!("{}-{}.tgz", chart.name, version))
        } else {
            self.progress("Packaging", "chart");
            std::fs::create_dir_all(&self.config.output_dir)
                .map_err(|e| StepFailure::new("packaging", e))?;
            helm.package(&self.config.output_dir, self.sign_options().as_ref())
                .await
                .map_err(|e| StepFailure::new("packaging", e))?
        };
        self.stage = PublishStage::Packaged;

        let url = self.config.repository.url.clone();
        if dry_run {
            self.intend(format!("push {} to {}", archive.display(), url));
        } else {
            self.progress("Pushing", "chart to repository");
            let publisher = Publisher::new(self.config.repository.clone(), helm);
            publisher
                .push(&archive)
                .await
                .map_err(|e| StepFailure::new("publish", e))?;
            publisher.logout().await;
        }
        self.stage = PublishStage::Published;

        Ok(if dry_run {
            format!("[DRY-RUN] Would publish {}@{} to {}", chart.name, version, url)
        } else {
            format!("Published {}@{} to {}", chart.name, version, url)
        })
    }

    fn sign_options(&self) -> Option<SignOptions> {
        self.config.sign.then(|| SignOptions {
            keyring: self.config.keyring.clone(),
            key: self.config.sign_key.clone(),
            passphrase_file: self.config.passphrase_file.clone(),
        })
    }

    fn progress(&self, verb: &str, what: &str) {
        println!("{} {}", style(verb).cyan().bold(), what);
    }

    fn intend(&self, action: impl AsRef<str>) {
        println!(
            "{} would {}",
            style("[DRY-RUN]").yellow().bold(),
            action.as_ref()
        );
    }
}
