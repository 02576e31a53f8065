//! Configuration structures for the routing pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Main configuration for docroute.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocrouteConfig {
    /// Destination tree configuration.
    pub routing: RoutingConfig,

    /// Entity extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output naming configuration.
    pub naming: NamingConfig,
}

/// Destination tree configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Root of the filing taxonomy. Must be absolute.
    pub base_path: PathBuf,

    /// Triage folder for documents carrying a CPF.
    pub person_folder: String,

    /// Triage folder for documents carrying a CNPJ.
    pub organization_folder: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("/Users/Shared/ORGANIZADO"),
            person_folder: "CPF_TITULAR".to_string(),
            organization_folder: "CNPJ_EMPRESA".to_string(),
        }
    }
}

/// Entity extraction configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Number of characters kept in the bundle preview.
    pub preview_chars: usize,

    /// Number of largest amounts kept in the bundle.
    pub max_amounts: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            preview_chars: 500,
            max_amounts: 10,
        }
    }
}

/// Output naming configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Extension used when the source file has none.
    pub default_extension: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            default_extension: "pdf".to_string(),
        }
    }
}

impl DocrouteConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.routing.base_path.is_absolute() {
            return Err(ConfigError::Invalid(format!(
                "routing.base_path must be absolute, got {}",
                self.routing.base_path.display()
            )));
        }
        for (key, folder) in [
            ("routing.person_folder", &self.routing.person_folder),
            ("routing.organization_folder", &self.routing.organization_folder),
        ] {
            if matches!(folder.as_str(), "" | "." | "..") || folder.contains(['/', '\\']) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a single folder name, got {:?}",
                    key, folder
                )));
            }
        }
        Ok(())
    }
}
