//! Configuration file support.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::graph::GraphRequest;

/// Application configuration loaded from config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default vault directory
    pub dir: Option<PathBuf>,

    /// Directory for cache databases
    pub cache_dir: Option<PathBuf>,

    /// Named vaults selectable with `--vault`
    pub vaults: HashMap<String, PathBuf>,

    /// Defaults for the `graph` command
    pub graph: GraphDefaults,
}

/// Graph limits used when the command line leaves them unset.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GraphDefaults {
    pub depth: Option<usize>,
    pub max_nodes: Option<usize>,
    pub timeout_ms: Option<u64>,
}

impl GraphDefaults {
    /// Fills the unset limits of `request`.
    pub fn apply(&self, request: &mut GraphRequest) {
        request.depth = request.depth.or(self.depth);
        request.max_nodes = request.max_nodes.or(self.max_nodes);
        request.timeout_ms = request.timeout_ms.or(self.timeout_ms);
    }
}

impl Config {
    /// Load configuration from the default config file location.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, or defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Returns the path to the config file.
    ///
    /// Default: `~/.config/vaultkit/config.toml`
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vaultkit")
            .join("config.toml")
    }

    /// Resolve the vault directory.
    ///
    /// Precedence order:
    /// 1. CLI `--dir` argument
    /// 2. CLI `--vault` name looked up in `[vaults]`
    /// 3. Config file `dir` setting
    /// 4. Current working directory
    pub fn vault_dir(&self, cli_dir: Option<&PathBuf>, cli_vault: Option<&str>) -> Result<PathBuf> {
        if let Some(dir) = cli_dir {
            return Ok(dir.clone());
        }
        if let Some(name) = cli_vault {
            return match self.vaults.get(name) {
                Some(path) => Ok(path.clone()),
                None => bail!("unknown vault '{}' (not listed under [vaults] in config)", name),
            };
        }
        Ok(self.dir.clone().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Resolve the cache directory; `None` means the per-user default.
    pub fn cache_dir(&self, cli_cache_dir: Option<&PathBuf>) -> Option<PathBuf> {
        cli_cache_dir.cloned().or_else(|| self.cache_dir.clone())
    }
}
