//! Configuration system for modelgrade.
//!
//! Uses `figment` for layered configuration: defaults -> config file -> environment -> CLI args.
//! Configuration is loaded from `~/.config/modelgrade/config.toml` and/or `modelgrade.toml`
//! in the workspace directory.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::EvalError;
use crate::metrics::binary::{DEFAULT_AUC_STEPS, DEFAULT_THRESHOLD};
use crate::metrics::regression::DEFAULT_MARE_EPSILON;

/// Name of the workspace-level config file.
pub const WORKSPACE_CONFIG_FILE: &str = "modelgrade.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Multiclass classifier evaluation.
    #[serde(default)]
    pub multiclass: MulticlassConfig,
    /// Binary classifier evaluation.
    #[serde(default)]
    pub binary: BinaryConfig,
    /// Regressor evaluation.
    #[serde(default)]
    pub regression: RegressionConfig,
    /// Report output.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Multiclass evaluation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MulticlassConfig {
    /// Files to compare, relative to the workspace.
    #[serde(default = "default_multiclass_files")]
    pub files: Vec<String>,
    /// Number of classes; each row has this many probability columns.
    #[serde(default = "default_num_classes")]
    pub num_classes: usize,
}

impl Default for MulticlassConfig {
    fn default() -> Self {
        Self {
            files: default_multiclass_files(),
            num_classes: default_num_classes(),
        }
    }
}

fn default_multiclass_files() -> Vec<String> {
    vec!["model.csv".to_string()]
}

fn default_num_classes() -> usize {
    5
}

/// Binary evaluation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryConfig {
    #[serde(default = "default_model_files")]
    pub files: Vec<String>,
    /// Decision threshold for the reported confusion matrix.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Threshold steps in the ROC sweep.
    #[serde(default = "default_auc_steps")]
    pub auc_steps: usize,
}

impl Default for BinaryConfig {
    fn default() -> Self {
        Self {
            files: default_model_files(),
            threshold: default_threshold(),
            auc_steps: default_auc_steps(),
        }
    }
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_auc_steps() -> usize {
    DEFAULT_AUC_STEPS
}

/// Regression evaluation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionConfig {
    #[serde(default = "default_model_files")]
    pub files: Vec<String>,
    /// Added to `|actual|` in the MARE denominator.
    #[serde(default = "default_mare_epsilon")]
    pub mare_epsilon: f64,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            files: default_model_files(),
            mare_epsilon: default_mare_epsilon(),
        }
    }
}

fn default_model_files() -> Vec<String> {
    (1..=3).map(|i| format!("model_{i}.csv")).collect()
}

fn default_mare_epsilon() -> f64 {
    DEFAULT_MARE_EPSILON
}

/// Report format. Parsed case-insensitively from config files, environment
/// variables and the command line alike.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(EvalError::config(format!("unknown output format '{other}'"))),
        }
    }
}

impl<'de> Deserialize<'de> for OutputFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Report output settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

impl EvalConfig {
    /// Reject settings the metric engine can't work with.
    pub fn validate(&self) -> Result<(), EvalError> {
        if self.multiclass.num_classes < 2 {
            return Err(EvalError::config("multiclass.num_classes must be at least 2"));
        }
        if !(0.0..=1.0).contains(&self.binary.threshold) {
            return Err(EvalError::config("binary.threshold must be within [0, 1]"));
        }
        if self.binary.auc_steps == 0 {
            return Err(EvalError::config("binary.auc_steps must be positive"));
        }
        let epsilon = self.regression.mare_epsilon;
        if epsilon.is_nan() || epsilon <= 0.0 {
            return Err(EvalError::config("regression.mare_epsilon must be positive"));
        }
        Ok(())
    }
}

/// Path of the user-level config file, if a home directory is known.
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "modelgrade", "modelgrade")
        .map(|d| d.config_dir().join("config.toml"))
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Explicit overrides (passed as argument)
/// 2. Environment variables (prefixed with `MODELGRADE_`)
/// 3. Explicit config file, or workspace-local `modelgrade.toml`
/// 4. User config (`~/.config/modelgrade/config.toml`)
/// 5. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    config_file: Option<&Path>,
    overrides: Option<&EvalConfig>,
) -> Result<EvalConfig, EvalError> {
    let mut figment = Figment::from(Serialized::defaults(EvalConfig::default()));

    if let Some(user_config) = user_config_path().filter(|p| p.exists()) {
        figment = figment.merge(Toml::file(user_config));
    }

    match config_file {
        Some(path) => {
            if !path.exists() {
                return Err(EvalError::config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }
        None => {
            if let Some(ws) = workspace {
                let ws_config = ws.join(WORKSPACE_CONFIG_FILE);
                if ws_config.exists() {
                    figment = figment.merge(Toml::file(ws_config));
                }
            }
        }
    }

    // Environment variables (MODELGRADE_BINARY__THRESHOLD, MODELGRADE_OUTPUT__FORMAT, etc.)
    figment = figment.merge(Env::prefixed("MODELGRADE_").split("__"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    let config: EvalConfig = figment.extract().map_err(Box::new)?;
    config.validate()?;
    Ok(config)
}
