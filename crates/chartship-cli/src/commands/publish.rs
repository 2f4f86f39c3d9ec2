//! Publish command - run the full pipeline for a chart

use console::style;
use std::path::{Path, PathBuf};

use crate::config::PublishConfig;
use crate::error::{CliError, Result};
use crate::pipeline::PublishPipeline;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    chart: &Path,
    version: Option<String>,
    config_path: Option<&Path>,
    repo_url: Option<String>,
    repo_type: Option<String>,
    username: Option<String>,
    password: Option<String>,
    output_dir: Option<PathBuf>,
    dry_run: bool,
    no_lint: bool,
    no_template: bool,
    no_deps: bool,
) -> Result<()> {
    let mut config = PublishConfig::load(config_path, chart)?;

    // Flags win over the configuration file
    if let Some(url) = repo_url {
        config.repository.url = url;
    }
    if let Some(kind) = repo_type {
        config.repository.kind = kind
            .parse()
            .map_err(|e: chartship_repo::RepoError| CliError::config(e.to_string()))?;
    }
    if let Some(username) = username {
        config.repository.username = Some(username);
    }
    if let Some(password) = password {
        config.repository.password = Some(password);
    }
    if let Some(output_dir) = output_dir {
        config.output_dir = output_dir;
    }
    config.dry_run = config.dry_run || dry_run;
    if no_lint {
        config.lint = false;
    }
    if no_template {
        config.template_validate = false;
    }
    if no_deps {
        config.dependencies.update = false;
        config.dependencies.build = false;
    }

    println!(
        "{} {}",
        style("Publishing").cyan().bold(),
        chart.display()
    );

    let mut pipeline = PublishPipeline::new(chart, config, version);
    let outcome = pipeline.run().await;

    if outcome.success {
        println!("{} {}", style("Success").green().bold(), outcome.message);
        Ok(())
    } else {
        Err(CliError::publish(outcome.message))
    }
}
