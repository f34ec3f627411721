//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the EA
//! configuration from YAML files.

use chrono::NaiveDate;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{AgreementMetadata, EngineConfig, RateTable, ValidationConfig};

/// Loads and provides access to the EA configuration.
///
/// # Directory Structure
///
/// ```text
/// config/ea_schedule1/
/// ├── agreement.yaml   # Agreement metadata
/// ├── validation.yaml  # Delivery hour bounds, description length
/// └── rates/
///     └── 2024-07-01.yaml  # Rate table effective from this date
/// ```
///
/// # Example
///
/// ```no_run
/// use timesheet_engine::config::ConfigLoader;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/ea_schedule1").unwrap();
/// let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
/// let table = loader.rate_table_for(date).unwrap();
/// println!("Rates in force: {}", table.version);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Fails with `ConfigNotFound` when a file is missing, `ConfigParseError`
    /// for malformed YAML and `InvalidConfig` when a rate table leaves a
    /// combination unpriced or prices it twice.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<AgreementMetadata>(&path.join("agreement.yaml"))?;
        let validation = Self::load_yaml::<ValidationConfig>(&path.join("validation.yaml"))?;
        let rate_tables = Self::load_rates(&path.join("rates"))?;

        Self::from_config(EngineConfig::new(metadata, rate_tables, validation))
    }

    /// Wraps an already-built configuration after checking it.
    pub fn from_config(config: EngineConfig) -> EngineResult<Self> {
        Self::check(&config)?;
        Ok(Self { config })
    }

    /// Wraps a configuration without the coverage check, for partial tables in tests.
    #[cfg(test)]
    pub(crate) fn unchecked(config: EngineConfig) -> Self {
        Self { config }
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

    /// Loads all rate tables from the rates directory.
    fn load_rates(rates_dir: &Path) -> EngineResult<Vec<RateTable>> {
        let rates_dir_str = rates_dir.display().to_string();

        let entries = fs::read_dir(rates_dir).map_err(|_| EngineError::ConfigNotFound {
            path: rates_dir_str.clone(),
        })?;

        let mut tables = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: rates_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                tables.push(Self::load_yaml::<RateTable>(&path)?);
            }
        }

        if tables.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no rate files found)", rates_dir_str),
            });
        }

        Ok(tables)
    }

    fn check(config: &EngineConfig) -> EngineResult<()> {
        let mut problems = Vec::new();

        let bounds = config.validation().delivery_hours;
        if bounds.min <= rust_decimal::Decimal::ZERO || bounds.min > bounds.max {
            problems.push(format!(
                "delivery hour bounds must be positive and ordered (min={}, max={})",
                bounds.min, bounds.max
            ));
        }

        let mut versions = HashSet::new();
        let mut dates = HashSet::new();
        for table in config.rate_tables() {
            if !versions.insert(table.version.as_str()) {
                problems.push(format!("duplicate rate version {}", table.version));
            }
            if !dates.insert(table.effective_date) {
                problems.push(format!(
                    "more than one rate table effective on {}",
                    table.effective_date
                ));
            }
            problems.extend(table.coverage_problems());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(EngineError::InvalidConfig {
                message: problems.join("; "),
            })
        }
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the agreement metadata.
    pub fn agreement(&self) -> &AgreementMetadata {
        self.config.agreement()
    }

    /// Returns the validation configuration.
    pub fn validation(&self) -> &ValidationConfig {
        self.config.validation()
    }

    /// Returns the rate table in force on `date`, if any.
    pub fn rate_table_for(&self, date: NaiveDate) -> Option<&RateTable> {
        self.config.rate_table_for(date)
    }

    /// Versions of every loaded rate table, oldest first.
    pub fn rate_versions(&self) -> Vec<&str> {
        self.config
            .rate_tables()
            .iter()
            .map(|table| table.version.as_str())
            .collect()
    }
}
