//! Client configuration: an optional JSON file, overridden by command-line flags.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV: &str = "WIDGET_CONFIG";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5055";
pub const DEFAULT_WIDGET_ID: &str = "w_1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_widget_id")]
    pub widget_id: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_widget_id() -> String {
    DEFAULT_WIDGET_ID.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            widget_id: default_widget_id(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl WidgetConfig {
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
        let cfg: WidgetConfig = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse {}", path.display()))?;
        cfg.validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(cfg)
    }

    /// `explicit` path, else `$WIDGET_CONFIG`, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        match path {
            Some(p) => Self::read(&p),
            None => Ok(Self::default()),
        }
    }

    pub fn with_overrides(mut self, base_url: Option<String>, widget_id: Option<String>) -> Result<Self> {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        if let Some(id) = widget_id {
            self.widget_id = id;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            anyhow::bail!("base_url must start with http:// or https:// (got {})", self.base_url);
        }
        if self.widget_id.trim().is_empty() {
            anyhow::bail!("widget_id is empty");
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be at least 1");
        }
        Ok(())
    }
}
