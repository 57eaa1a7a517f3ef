/// Console configuration
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use taptune_scan::ScanConfig;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_catalog")]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogSettings {
    /// Catalog JSON file; the built-in demo catalog is used when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl ConsoleConfig {
    /// Load configuration from file and environment
    ///
    /// Without an explicit path, `taptune.toml` in the working directory is
    /// used if it exists. Environment variables prefixed with `TAPTUNE_`
    /// override file values, e.g. `TAPTUNE_STORAGE__DATABASE_URL`.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let config_path = PathBuf::from("taptune.toml");
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        // Override with environment variables (prefixed with TAPTUNE_)
        settings = settings.add_source(
            config::Environment::with_prefix("TAPTUNE")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build().context("failed to read configuration")?;

        config
            .try_deserialize()
            .context("failed to parse configuration")
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.storage.database_url.is_empty() {
            anyhow::bail!("storage.database_url must not be empty");
        }

        if let Some(path) = &self.catalog.path {
            if !path.exists() {
                anyhow::bail!("catalog file not found: {}", path.display());
            }
        }

        if self.scan.history_capacity == 0 {
            anyhow::bail!("scan.history_capacity must be at least 1");
        }

        // Zero-capacity channels panic at creation time
        if self.scan.command_capacity == 0 || self.scan.event_capacity == 0 {
            anyhow::bail!("scan channel capacities must be at least 1");
        }

        Ok(())
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            storage: default_storage(),
            catalog: default_catalog(),
            scan: ScanConfig::default(),
        }
    }
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_catalog() -> CatalogSettings {
    CatalogSettings { path: None }
}

fn default_database_url() -> String {
    "sqlite://taptune.db".to_string()
}
