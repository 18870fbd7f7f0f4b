//! modelgrade CLI — compare model output files and report the best model per metric.

mod commands;
mod report;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// modelgrade: evaluate classifier and regressor outputs stored in CSV files
#[derive(Parser, Debug)]
#[command(name = "modelgrade", version, about, long_about = None)]
struct Cli {
    /// Directory the model files are resolved against
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Configuration file path (defaults to <workspace>/modelgrade.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format: text, json
    #[arg(long)]
    format: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Evaluate binary classifiers (label, probability)
    Binary {
        /// Model files to compare (overrides the configured list)
        files: Vec<String>,

        /// Decision threshold for the confusion matrix
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Threshold steps in the ROC sweep
        #[arg(long)]
        auc_steps: Option<usize>,
    },
    /// Evaluate multiclass classifiers (label, one probability per class)
    Multiclass {
        /// Model files to compare (overrides the configured list)
        files: Vec<String>,

        /// Number of classes
        #[arg(short = 'k', long)]
        classes: Option<usize>,
    },
    /// Evaluate regressors (actual, predicted)
    Regression {
        /// Model files to compare (overrides the configured list)
        files: Vec<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Create a default modelgrade.toml in the workspace
    Init,
    /// Show the effective configuration
    Show,
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up tracing: human-readable stderr + JSON file logging
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter));

    let log_dir = directories::ProjectDirs::from("dev", "modelgrade", "modelgrade")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "modelgrade.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    // Resolve workspace
    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| cli.workspace.clone());
    tracing::debug!(workspace = %workspace.display(), "Resolved workspace");

    let options = commands::GlobalOptions {
        workspace,
        config: cli.config,
        format: cli.format,
    };
    commands::handle_command(cli.command, &options)
}
