//! CLI configuration

use crate::error::{CliError, CliResult};
use crate::output::OutputFormat;
use farm_types::SpecDefaults;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FarmConfig {
    /// Image for domains that do not name one
    pub default_image: Option<String>,

    /// Output format when `--output` is not given
    pub default_output: Option<OutputFormat>,

    /// Log every computed startup plan
    pub audit_decisions: Option<bool>,
}

impl FarmConfig {
    /// Load configuration from file
    pub fn load(path: Option<&str>) -> CliResult<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let config: FarmConfig =
                toml::from_str(&contents).map_err(|e| CliError::Config(e.to_string()))?;
            Ok(config)
        } else {
            Ok(FarmConfig::default())
        }
    }

    /// Platform defaults for spec construction
    pub fn spec_defaults(&self) -> SpecDefaults {
        let mut defaults = SpecDefaults::default();
        if let Some(image) = &self.default_image {
            defaults.image = image.clone();
        }
        defaults
    }

    pub fn audit_decisions(&self) -> bool {
        self.audit_decisions.unwrap_or(true)
    }

    /// Get the default configuration file path
    fn default_config_path() -> CliResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CliError::Config("Cannot find config directory".into()))?;
        Ok(config_dir.join("farm").join("config.toml"))
    }
}
