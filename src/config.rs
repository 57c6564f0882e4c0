use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Values used when the matching flag is not given on the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub state_path: PathBuf,
    pub resource_group: String,
    /// Defaults to the source subscription when not set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_subscription_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: String,
    pub color: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from("terraform.tfstate"),
            resource_group: "*".to_string(),
            target_subscription_id: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            color: true,
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            // Try .aztfmove.toml in current dir, then ~/.config/aztfmove/config.toml
            let local = PathBuf::from(".aztfmove.toml");
            if local.exists() {
                local
            } else {
                dirs::config_dir()
                    .map(|d| d.join("aztfmove").join("config.toml"))
                    .unwrap_or_else(|| PathBuf::from(".aztfmove.toml"))
            }
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))
                .with_context(|| {
                    let mut err = format!("Failed to parse config: {}", config_path.display());
                    err.push_str("\n  Common issues:");
                    err.push_str("\n    - Invalid TOML syntax");
                    err.push_str("\n    - Incorrect value types");
                    err.push_str("\n  Tip: Run 'aztfmove init' to create a new config file");
                    err
                })?;
            config.validate()?;
            Ok(config)
        } else {
            if path.is_some() {
                tracing::warn!(
                    "Config file not found: {}, using default configuration",
                    config_path.display()
                );
            }
            Ok(Config::default())
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !matches!(self.output.format.as_str(), "text" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "output.format".to_string(),
                reason: format!("expected 'text' or 'json', got '{}'", self.output.format),
            });
        }
        if self.defaults.resource_group.is_empty() {
            return Err(ConfigError::MissingField(
                "defaults.resource_group".to_string(),
            ));
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

pub fn init_config(output: &Path) -> Result<()> {
    let config = Config::default();
    config.save(output)?;
    println!("Created config file: {}", output.display());
    Ok(())
}
