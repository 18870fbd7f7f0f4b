//! CLI subcommand handlers.

use anyhow::Context;
use modelgrade_core::config::WORKSPACE_CONFIG_FILE;
use modelgrade_core::{Comparison, EvalConfig, OutputFormat};
use serde::Serialize;
use std::path::PathBuf;

use crate::report::{RenderReport, TextReport, to_json};
use crate::{Commands, ConfigAction};

/// Options shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub workspace: PathBuf,
    pub config: Option<PathBuf>,
    pub format: Option<String>,
}

/// Handle a CLI subcommand.
pub fn handle_command(command: Commands, options: &GlobalOptions) -> anyhow::Result<()> {
    let root = options.workspace.as_path();
    match &command {
        Commands::Config { action } => handle_config(action, options),
        Commands::Binary { .. } => {
            let config = prepare(&command, options)?;
            let comparison = modelgrade_core::compare_binary(root, &config)?;
            print_comparison(&comparison, config.output.format)
        }
        Commands::Multiclass { .. } => {
            let config = prepare(&command, options)?;
            let comparison = modelgrade_core::compare_multiclass(root, &config)?;
            print_comparison(&comparison, config.output.format)
        }
        Commands::Regression { .. } => {
            let config = prepare(&command, options)?;
            let comparison = modelgrade_core::compare_regression(root, &config)?;
            print_comparison(&comparison, config.output.format)
        }
    }
}

/// Effective configuration for an evaluation command.
fn prepare(command: &Commands, options: &GlobalOptions) -> anyhow::Result<EvalConfig> {
    let mut config = load(options)?;
    apply_overrides(&mut config, command, options)?;
    config.validate()?;
    Ok(config)
}

fn load(options: &GlobalOptions) -> anyhow::Result<EvalConfig> {
    modelgrade_core::load_config(Some(&options.workspace), options.config.as_deref(), None)
        .context("Failed to load config")
}

/// Fold command-line flags into the loaded configuration.
fn apply_overrides(
    config: &mut EvalConfig,
    command: &Commands,
    options: &GlobalOptions,
) -> anyhow::Result<()> {
    if let Some(format) = &options.format {
        config.output.format = format.parse::<OutputFormat>()?;
    }

    match command {
        Commands::Binary {
            files,
            threshold,
            auc_steps,
        } => {
            if !files.is_empty() {
                config.binary.files = files.clone();
            }
            if let Some(threshold) = threshold {
                config.binary.threshold = *threshold;
            }
            if let Some(steps) = auc_steps {
                config.binary.auc_steps = *steps;
            }
        }
        Commands::Multiclass { files, classes } => {
            if !files.is_empty() {
                config.multiclass.files = files.clone();
            }
            if let Some(classes) = classes {
                config.multiclass.num_classes = *classes;
            }
        }
        Commands::Regression { files } => {
            if !files.is_empty() {
                config.regression.files = files.clone();
            }
        }
        Commands::Config { .. } => {}
    }
    Ok(())
}

fn print_comparison<R: RenderReport + Serialize>(
    comparison: &Comparison<R>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print!("{}", TextReport(comparison)),
        OutputFormat::Json => println!("{}", to_json(comparison)?),
    }
    Ok(())
}

fn handle_config(action: &ConfigAction, options: &GlobalOptions) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_path = init_config(options)?;
            println!(
                "Created default configuration at: {}",
                config_path.display()
            );
            Ok(())
        }
        ConfigAction::Show => {
            let config = load(options)?;
            let toml_str = toml::to_string_pretty(&config)?;
            println!("{}", toml_str);
            Ok(())
        }
    }
}

/// Write a default config file, refusing to overwrite an existing one.
fn init_config(options: &GlobalOptions) -> anyhow::Result<PathBuf> {
    let config_path = options
        .config
        .clone()
        .unwrap_or_else(|| options.workspace.join(WORKSPACE_CONFIG_FILE));
    if config_path.exists() {
        anyhow::bail!(
            "Configuration file already exists at: {}",
            config_path.display()
        );
    }
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(&EvalConfig::default())?;
    std::fs::write(&config_path, toml_str)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    Ok(config_path)
}
