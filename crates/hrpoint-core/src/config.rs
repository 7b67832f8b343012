use crate::error::{HrPointError, Result};
use crate::limits::Limits;
use crate::locale::Locale;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default data file used by the CLI
pub const DEFAULT_DATA_FILE: &str = "hrpoints.json";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has at least the current precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() >= self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration: defaults, then file, then environment, then CLI
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub locale: ConfigValue<Locale>,
    pub data_file: ConfigValue<PathBuf>,
    pub limits: ConfigValue<Limits>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            locale: ConfigValue::new(Locale::En, ConfigSource::Default),
            data_file: ConfigValue::new(PathBuf::from(DEFAULT_DATA_FILE), ConfigSource::Default),
            limits: ConfigValue::new(Limits::default(), ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| HrPointError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| HrPointError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(locale) = file_config.locale {
            self.locale.update(locale.parse()?, ConfigSource::File);
        }

        if let Some(data_file) = file_config.data_file {
            self.data_file.update(data_file, ConfigSource::File);
        }

        if let Some(limits) = file_config.limits {
            limits.validate()?;
            self.limits.update(limits, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // HRPOINT_LOCALE
        if let Ok(locale_str) = env::var("HRPOINT_LOCALE") {
            match locale_str.parse::<Locale>() {
                Ok(locale) => self.locale.update(locale, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid HRPOINT_LOCALE value '{}': expected en or pt-BR",
                    locale_str
                ),
            }
        }

        // HRPOINT_DATA_FILE
        if let Ok(path) = env::var("HRPOINT_DATA_FILE") {
            self.data_file.update(PathBuf::from(path), ConfigSource::Environment);
        }

        // HRPOINT_NEARBY_MAX_POINTS
        if let Ok(max_str) = env::var("HRPOINT_NEARBY_MAX_POINTS") {
            match max_str.parse::<usize>() {
                Ok(max) if max > 0 => {
                    let limits = Limits { near_by_max_points: max, ..self.limits.value.clone() };
                    self.limits.update(limits, ConfigSource::Environment);
                }
                _ => tracing::warn!(
                    "Invalid HRPOINT_NEARBY_MAX_POINTS value '{}': expected positive integer",
                    max_str
                ),
            }
        }

        // HRPOINT_MAX_DISTANCE_KM
        if let Ok(dist_str) = env::var("HRPOINT_MAX_DISTANCE_KM") {
            match dist_str.parse::<f64>() {
                Ok(km) if km.is_finite() && km > 0.0 => {
                    let limits = Limits { max_distance_km: km, ..self.limits.value.clone() };
                    self.limits.update(limits, ConfigSource::Environment);
                }
                _ => tracing::warn!(
                    "Invalid HRPOINT_MAX_DISTANCE_KM value '{}': expected positive number",
                    dist_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(locale) = overrides.locale {
            self.locale.update(locale, ConfigSource::Cli);
        }

        if let Some(data_file) = overrides.data_file {
            self.data_file.update(data_file, ConfigSource::Cli);
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();
        let limits = &self.limits.value;
        let limits_source = self.limits.source;

        map.insert("locale".to_string(), (self.locale.value.to_string(), self.locale.source));
        map.insert(
            "data_file".to_string(),
            (self.data_file.value.display().to_string(), self.data_file.source),
        );

        let entries = [
            ("limits.radius", format!("{}..={} m", limits.radius_min, limits.radius_max)),
            ("limits.risk", format!("{}..={}", limits.risk_min, limits.risk_max)),
            ("limits.add_batch", format!("{}..={}", limits.add_batch_min, limits.add_batch_max)),
            ("limits.near_by_max_points", limits.near_by_max_points.to_string()),
            ("limits.max_distance_km", limits.max_distance_km.to_string()),
            ("limits.title_max_len", limits.title_max_len.to_string()),
            ("limits.delta_max", limits.delta_max.to_string()),
        ];
        for (key, value) in entries {
            map.insert(key.to_string(), (value, limits_source));
        }

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    locale: Option<String>,
    data_file: Option<PathBuf>,
    limits: Option<Limits>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub locale: Option<Locale>,
    pub data_file: Option<PathBuf>,
}
