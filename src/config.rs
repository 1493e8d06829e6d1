// Client configuration: API key, base URL and an optional request timeout.
// Values come from explicit arguments, then the environment, then a JSON
// file in the user's home directory.

use crate::error::{BenchlingError, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default Benchling API root.
pub const DEFAULT_BASE_URL: &str = "https://api.benchling.com/v1/";

pub const API_KEY_VAR: &str = "BENCHLING_API_KEY";
pub const BASE_URL_VAR: &str = "BENCHLING_API_URL";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Partially filled configuration read from the config file.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Config {
            api_key: api_key.into(),
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Resolve a configuration. Explicit values win over `BENCHLING_API_KEY`
    /// / `BENCHLING_API_URL`, which win over `~/.benchling/config.json`.
    pub fn resolve(api_key: Option<String>, base_url: Option<String>) -> Result<Self> {
        Self::resolve_from(
            api_key,
            base_url,
            std::env::var(API_KEY_VAR).ok(),
            std::env::var(BASE_URL_VAR).ok(),
            default_path().as_deref(),
        )
    }

    /// A broken config file only matters when the key has to come from it.
    fn resolve_from(
        api_key: Option<String>,
        base_url: Option<String>,
        env_key: Option<String>,
        env_url: Option<String>,
        path: Option<&Path>,
    ) -> Result<Self> {
        let key_known = api_key
            .iter()
            .chain(env_key.iter())
            .any(|k| !k.trim().is_empty());
        let file = match path {
            Some(path) if path.exists() => match read_file(path) {
                Ok(file) => file,
                Err(e) if key_known => {
                    warn!("ignoring config file: {}", e);
                    FileConfig::default()
                }
                Err(e) => return Err(e),
            },
            _ => FileConfig::default(),
        };
        Self::merge(api_key, base_url, env_key, env_url, file)
    }

    /// Load the configuration stored at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let file = read_file(path)?;
        Self::merge(None, None, None, None, file)
    }

    fn merge(
        api_key: Option<String>,
        base_url: Option<String>,
        env_key: Option<String>,
        env_url: Option<String>,
        file: FileConfig,
    ) -> Result<Self> {
        let api_key = api_key
            .or(env_key)
            .or(file.api_key)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                BenchlingError::Config(format!(
                    "no API key given; pass --api-key, set {} or add it to {}",
                    API_KEY_VAR,
                    default_path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "~/.benchling/config.json".into())
                ))
            })?;
        let base_url = base_url
            .or(env_url)
            .or(file.base_url)
            .unwrap_or_else(default_base_url);
        Ok(Config {
            api_key,
            base_url,
            timeout_secs: file.timeout_secs,
        })
    }

    /// Write this configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

/// Location of the per-user config file, `~/.benchling/config.json`.
pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".benchling").join("config.json"))
}

fn read_file(path: &Path) -> Result<FileConfig> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text)
        .map_err(|e| BenchlingError::Config(format!("{}: {}", path.display(), e)))
}
