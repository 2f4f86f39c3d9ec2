//! Check command - preflight validation of the environment and chart

use console::style;
use std::path::Path;

use chartship_core::Chart;
use chartship_helm::HelmCli;

use crate::config::PublishConfig;
use crate::error::{CliError, Result};

pub async fn run(chart_dir: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = PublishConfig::load(config_path, chart_dir)?;
    let mut failures: Vec<String> = Vec::new();

    println!("{} {}", style("Checking").cyan().bold(), chart_dir.display());

    // Helm must be installed, and OCI support needs Helm 3.x
    let helm = HelmCli::new(chart_dir);
    match helm.version().await {
        Ok(version) if version.starts_with("v3") => {
            println!("  {} helm {}", style("ok").green(), version);
        }
        Ok(version) => failures.push(format!("Helm 3.x is required, found {}", version)),
        Err(e) => failures.push(format!("Helm CLI not usable: {}", e)),
    }

    // Chart must exist, parse, and satisfy publish invariants
    match Chart::load(chart_dir).and_then(|c| c.validate().map(|_| c)) {
        Ok(chart) => {
            println!("  {} {} v{}", style("ok").green(), chart.name, chart.version);
            if let Err(e) = chart.parsed_version() {
                failures.push(format!("chart version is not SemVer: {}", e));
            }
        }
        Err(e) => failures.push(e.to_string()),
    }

    if config.repository.url.is_empty() {
        failures.push("repository URL is not configured".to_string());
    } else {
        println!(
            "  {} repository {} ({})",
            style("ok").green(),
            config.repository.url,
            config.repository.kind
        );
    }

    if failures.is_empty() {
        println!("{}", style("All checks passed").green().bold());
        Ok(())
    } else {
        for failure in &failures {
            eprintln!("  {} {}", style("error").red().bold(), failure);
        }
        Err(CliError::CheckFailed {
            failed: failures.len(),
        })
    }
}
