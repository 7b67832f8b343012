//! Configuration and data file handling shared by every command

use crate::cli::Cli;
use anyhow::{Context, Result};
use hrpoint_core::config::{CliConfigOverrides, LayeredConfig};
use hrpoint_core::{Limits, Locale};
use hrpoint_query::ProximityQueryEngine;
use hrpoint_store::{initialize, InitReport, MemorySpatialEngine, RiskPointStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "hrpoint.toml";

/// Resolve configuration: defaults < file < environment < CLI flags
pub fn load_config(cli: &Cli) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    match &cli.config {
        Some(path) => {
            config = config
                .load_from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
        }
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            config = config
                .load_from_file(DEFAULT_CONFIG_FILE)
                .with_context(|| format!("Failed to load {}", DEFAULT_CONFIG_FILE))?;
        }
        None => {}
    }

    let mut config = config.load_from_env();
    config.update_from_cli(CliConfigOverrides { locale: cli.locale, data_file: cli.data.clone() });

    tracing::debug!("Resolved configuration: {:?}", config);
    Ok(config)
}

/// Loaded data file with an initialized risk point collection
pub struct Workspace {
    engine: Arc<MemorySpatialEngine>,
    data_file: PathBuf,
    limits: Limits,
    locale: Locale,
    pub init_report: InitReport,
}

impl Workspace {
    /// Load the data file and make sure the collection and index exist
    pub async fn open(config: &LayeredConfig) -> Result<Self> {
        let data_file = config.data_file.value.clone();
        let limits = config.limits.value.clone();

        let engine = MemorySpatialEngine::load(&data_file)
            .await
            .with_context(|| format!("Failed to open data file {}", data_file.display()))?;
        let init_report = initialize(&engine, &limits).await?;

        Ok(Self {
            engine: Arc::new(engine),
            data_file,
            limits,
            locale: config.locale.value,
            init_report,
        })
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    pub fn store(&self) -> RiskPointStore<MemorySpatialEngine> {
        RiskPointStore::new(Arc::clone(&self.engine), self.limits.clone(), self.locale)
    }

    pub fn query_engine(&self) -> ProximityQueryEngine<MemorySpatialEngine> {
        ProximityQueryEngine::new(Arc::clone(&self.engine), self.limits.clone(), self.locale)
    }

    /// Persist the collection back to the data file
    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.data_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        self.engine
            .save(&self.data_file)
            .await
            .with_context(|| format!("Failed to write data file {}", self.data_file.display()))?;
        tracing::debug!("Saved {}", self.data_file.display());
        Ok(())
    }
}
