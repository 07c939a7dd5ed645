//! aggsync - regenerate the aggregation package from an upstream checkout
//!
//! Extracts the exported aggregation files, rewrites them for the generated
//! package, repairs unresolved names and publishes the result into the
//! project directory.

use aggsync::{PackageUpdater, SyncConfig, SyncError};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// aggsync CLI
#[derive(Parser)]
#[command(name = "aggsync")]
#[command(about = "Sync the generated aggregation package with upstream", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "AGGSYNC_CONFIG")]
    config: Option<PathBuf>,

    /// Checked-out upstream library
    #[arg(long, env = "AGGSYNC_UPSTREAM_DIR")]
    upstream: Option<PathBuf>,

    /// Scratch directory, cleared before the run
    #[arg(long, env = "AGGSYNC_BUILD_DIR")]
    build: Option<PathBuf>,

    /// Project the package is published to
    #[arg(long, env = "AGGSYNC_PROJECT_DIR")]
    project: Option<PathBuf>,

    /// Wrapper type files copied from the project into the build
    #[arg(long = "dependency", env = "AGGSYNC_DEPENDENCIES", value_delimiter = ',')]
    dependencies: Vec<String>,

    /// Upper bound on self-healing steps
    #[arg(long, env = "AGGSYNC_MAX_ITERATIONS")]
    max_iterations: Option<usize>,

    /// Log level
    #[arg(long, env = "AGGSYNC_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "AGGSYNC_LOG_JSON")]
    json: bool,
}

impl Cli {
    /// Load the configuration file and apply the flags given on top of it.
    fn into_config(self) -> Result<SyncConfig, SyncError> {
        let mut config = SyncConfig::load(self.config.as_deref())?;
        if let Some(upstream) = self.upstream {
            config.paths.upstream_dir = upstream;
        }
        if let Some(build) = self.build {
            config.paths.build_dir = build;
        }
        if let Some(project) = self.project {
            config.paths.project_dir = project;
        }
        if !self.dependencies.is_empty() {
            config.package.dependencies = self.dependencies;
        }
        if let Some(max_iterations) = self.max_iterations {
            config.repair.max_iterations = max_iterations;
        }
        Ok(config)
    }
}

fn init_tracing(cli: &Cli) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_level.clone().into());

    if cli.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// The stage of the run an error stopped.
fn failed_stage(err: &SyncError) -> &'static str {
    match err {
        SyncError::Config(_) | SyncError::Pattern(_) => "configuration",
        SyncError::Io { .. } => "filesystem",
        SyncError::Parse { .. } => "parse",
        SyncError::StrategyPrecondition { .. }
        | SyncError::FieldNotFound { .. }
        | SyncError::MissingBody { .. } => "rewrite",
        SyncError::DiagnosticFormat { .. } => "verification",
        SyncError::NotConverged { .. } => "repair",
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    let result = cli
        .into_config()
        .and_then(PackageUpdater::new)
        .and_then(|updater| updater.run());

    match result {
        Ok(report) => {
            info!(
                records = report.records.len(),
                repairs = report.repairs,
                deprecated = report.deprecated.len(),
                mapping = %report.mapping.display(),
                "sync finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            // Files saved before the failure are left as they are.
            error!(stage = failed_stage(&err), "sync cannot be finished: {err}");
            ExitCode::FAILURE
        }
    }
}
