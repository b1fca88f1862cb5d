//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which selects where the session record is stored and how long the
//! simulated logins take.
//!
//! Configuration is stored at `~/.config/photo-helper/config.json`.
//! `PHOTO_HELPER_STORE` and `PHOTO_HELPER_LOGIN_DELAY_MS` override the file.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::auth::SessionOptions;
use crate::store::{FileStore, KeyringStore, MemoryStore, SessionStore};

/// Application name used for config/data directory paths
const APP_NAME: &str = "photo-helper";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const DEFAULT_LOGIN_DELAY_MS: u64 = 1500;

const ENV_STORE: &str = "PHOTO_HELPER_STORE";
const ENV_LOGIN_DELAY_MS: &str = "PHOTO_HELPER_LOGIN_DELAY_MS";

/// Where the session record is kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    File,
    Keyring,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(StoreBackend::File),
            "keyring" | "keychain" => Ok(StoreBackend::Keyring),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow::anyhow!("Unknown session store: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreBackend,
    pub login_delay_ms: u64,
    /// Overrides the platform data directory for the file store
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreBackend::default(),
            login_delay_ms: DEFAULT_LOGIN_DELAY_MS,
            data_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            Self::from_json(&contents)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Failed to parse config file")
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup. Invalid values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_STORE) {
            match value.parse() {
                Ok(store) => self.store = store,
                Err(e) => warn!(error = %e, "Ignoring {}", ENV_STORE),
            }
        }
        if let Some(value) = lookup(ENV_LOGIN_DELAY_MS) {
            match value.trim().parse() {
                Ok(ms) => self.login_delay_ms = ms,
                Err(e) => warn!(error = %e, value = %value, "Ignoring {}", ENV_LOGIN_DELAY_MS),
            }
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            login_delay: Duration::from_millis(self.login_delay_ms),
        }
    }

    /// Build the configured session store
    pub fn open_store(&self) -> Result<Arc<dyn SessionStore>> {
        let store: Arc<dyn SessionStore> = match self.store {
            StoreBackend::File => Arc::new(FileStore::new(self.data_dir()?)),
            StoreBackend::Keyring => Arc::new(KeyringStore::new()),
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
        };
        Ok(store)
    }
}
