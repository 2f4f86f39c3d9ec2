//! Chartship CLI - publish Helm charts to OCI registries and chart repositories

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod error;
mod exit_codes;
mod pipeline;

use error::CliError;

#[derive(Parser)]
#[command(name = "chartship")]
#[command(author = "Chartship Contributors")]
#[command(version)]
#[command(about = "Publish Helm charts to OCI registries and chart repositories", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the publish pipeline for a chart
    #[command(disable_version_flag = true)]
    Publish {
        /// Chart directory
        #[arg(default_value = ".")]
        chart: PathBuf,

        /// Release version to publish (defaults to the version in Chart.yaml)
        #[arg(long)]
        version: Option<String>,

        /// Configuration file (defaults to <chart>/.chartship.yaml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Repository URL
        #[arg(long)]
        repo_url: Option<String>,

        /// Repository type (oci, chartmuseum, http)
        #[arg(long)]
        repo_type: Option<String>,

        /// Repository username
        #[arg(long)]
        username: Option<String>,

        /// Repository password
        #[arg(long, env = "CHARTSHIP_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Output directory for the packaged chart
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Log intended actions without mutating or uploading anything
        #[arg(long)]
        dry_run: bool,

        /// Skip linting
        #[arg(long)]
        no_lint: bool,

        /// Skip template validation
        #[arg(long)]
        no_template: bool,

        /// Skip dependency update and build
        #[arg(long)]
        no_deps: bool,
    },

    /// Check the environment and chart before publishing
    Check {
        /// Chart directory
        #[arg(default_value = ".")]
        chart: PathBuf,

        /// Configuration file (defaults to <chart>/.chartship.yaml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();

    if cli.debug {
        // SAFETY: The async runtime has not started; we're the only thread
        unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
    }

    if let Err(err) = run(cli) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

#[tokio::main]
async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Publish {
            chart,
            version,
            config,
            repo_url,
            repo_type,
            username,
            password,
            output_dir,
            dry_run,
            no_lint,
            no_template,
            no_deps,
        } => {
            commands::publish::run(
                &chart,
                version,
                config.as_deref(),
                repo_url,
                repo_type,
                username,
                password,
                output_dir,
                dry_run,
                no_lint,
                no_template,
                no_deps,
            )
            .await
        }

        Commands::Check { chart, config } => commands::check::run(&chart, config.as_deref()).await,
    }
}
