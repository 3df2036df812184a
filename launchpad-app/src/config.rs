use anyhow::{bail, Context, Result};
use launchpad_core::DEFAULT_EXPLORER_URL;
use launchpad_providers::BackendConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "launchpad.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default = "default_explorer_url")]
    pub explorer_url: String,
}

fn default_explorer_url() -> String {
    DEFAULT_EXPLORER_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            explorer_url: default_explorer_url(),
        }
    }
}

impl Config {
    /// `LAUNCHPAD_CONFIG` overrides the default location.
    pub fn path() -> PathBuf {
        std::env::var("LAUNCHPAD_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(CONFIG_FILE))
    }

    pub fn exists() -> bool {
        Self::path().exists()
    }

    /// Loads the config file if present, otherwise defaults, then applies
    /// environment overrides and validates.
    pub fn load() -> Result<Self> {
        let path = Self::path();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("LAUNCHPAD_BACKEND_URL") {
            self.backend.base_url = url;
        }
        if let Some(timeout) = lookup("LAUNCHPAD_TIMEOUT_SECS") {
            self.backend.timeout_secs = timeout
                .trim()
                .parse()
                .with_context(|| format!("Invalid LAUNCHPAD_TIMEOUT_SECS: {:?}", timeout))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.backend.base_url.trim();
        if url.is_empty() {
            bail!("backend.base_url must not be empty");
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            bail!("backend.base_url must be an http(s) URL, got {:?}", url);
        }
        if self.backend.timeout_secs == 0 {
            bail!("backend.timeout_secs must be greater than zero");
        }
        for (name, path) in self.backend.endpoints.iter() {
            if !path.starts_with('/') {
                bail!("backend.endpoints.{} must start with '/', got {:?}", name, path);
            }
        }
        Ok(())
    }
}
