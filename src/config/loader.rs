//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading a
//! jurisdiction configuration from a directory of YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{
    AllowancesConfig, ContributionsConfig, JurisdictionConfig, JurisdictionMetadata,
    TaxClassConfig, TaxClassesConfig,
};

/// Loads and provides access to a jurisdiction configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory,
/// checks the bracket preconditions the calculation engine relies on,
/// and exposes the resulting [`JurisdictionConfig`] snapshot.
///
/// # Directory Structure
///
/// ```text
/// config/de_2025/
/// ├── jurisdiction.yaml   # Country, currency, tax year
/// ├── tax_classes.yaml    # Tax classes and bracket schedules
/// ├── contributions.yaml  # Social contributions, solidarity and church tax
/// └── allowances.yaml     # Allowances, vehicle benefit rates, pension ceiling
/// ```
///
/// # Example
///
/// ```no_run
/// use net_pay_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/de_2025").unwrap();
/// let class = loader.get_tax_class("I").unwrap();
/// println!("Tax class: {}", class.label);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: JurisdictionConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any required file is missing, contains invalid
    /// YAML, or describes a bracket schedule the engine cannot evaluate.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let meta = Self::load_yaml::<JurisdictionMetadata>(&path.join("jurisdiction.yaml"))?;
        let tax_classes = Self::load_yaml::<TaxClassesConfig>(&path.join("tax_classes.yaml"))?;
        let contributions =
            Self::load_yaml::<ContributionsConfig>(&path.join("contributions.yaml"))?;
        let allowances = Self::load_yaml::<AllowancesConfig>(&path.join("allowances.yaml"))?;

        let config = JurisdictionConfig::new(meta, tax_classes, contributions, allowances);
        let loader = Self::from_config(config)?;

        debug!(
            path = %path.display(),
            country = %loader.config.meta.country,
            tax_year = loader.config.meta.tax_year,
            tax_classes = loader.config.tax_classes.len(),
            "Loaded jurisdiction configuration"
        );

        Ok(loader)
    }

    /// Wraps an already-built snapshot after validating it.
    pub fn from_config(config: JurisdictionConfig) -> EngineResult<Self> {
        for (id, tax_class) in &config.tax_classes {
            validate_brackets(id, tax_class)?;
        }
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying jurisdiction configuration.
    pub fn config(&self) -> &JurisdictionConfig {
        &self.config
    }

    /// Returns the jurisdiction metadata.
    pub fn metadata(&self) -> &JurisdictionMetadata {
        &self.config.meta
    }

    /// Gets a tax class by its identifier.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use net_pay_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/de_2025")?;
    /// let class = loader.get_tax_class("III")?;
    /// println!("Basic allowance: {}", class.basic_allowance);
    /// # Ok::<(), net_pay_engine::error::EngineError>(())
    /// ```
    pub fn get_tax_class(&self, id: &str) -> EngineResult<&TaxClassConfig> {
        self.config.tax_class(id)
    }
}

/// Checks that a bracket schedule is non-empty, strictly ascending, and
/// ends in exactly one unbounded bracket.
fn validate_brackets(id: &str, tax_class: &TaxClassConfig) -> EngineResult<()> {
    let Some((last, bounded)) = tax_class.brackets.split_last() else {
        return Err(EngineError::InvalidConfig {
            message: format!("tax class '{}' has no brackets", id),
        });
    };

    if last.up_to.is_some() {
        return Err(EngineError::InvalidConfig {
            message: format!("tax class '{}': final bracket must be unbounded", id),
        });
    }

    let mut previous = None;
    for (index, bracket) in bounded.iter().enumerate() {
        let Some(upper) = bracket.up_to else {
            return Err(EngineError::InvalidConfig {
                message: format!(
                    "tax class '{}': bracket {} is unbounded but not last",
                    id,
                    index + 1
                ),
            });
        };
        if previous.is_some_and(|p| upper <= p) {
            return Err(EngineError::InvalidConfig {
                message: format!(
                    "tax class '{}': bracket {} upper bound {} is not ascending",
                    id,
                    index + 1,
                    upper
                ),
            });
        }
        previous = Some(upper);
    }

    Ok(())
}
