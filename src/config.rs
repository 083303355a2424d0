//! Quality check configuration loading.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;
use crate::rules::{FileChange, FileSelector, RuleSet};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "PR_QUALITY_CHECK_CONFIG";

/// Project configuration path, relative to the repository root.
pub const PROJECT_CONFIG_PATH: &str = ".github/pr-quality-check.yml";

const GLOBAL_CONFIG_FILE: &str = "config.yml";

/// The quality check configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QualityConfig {
    /// Which changed files are reviewed.
    #[serde(default)]
    pub files: FileSelector,
    /// Rules keyed by glob pattern.
    #[serde(default)]
    pub rules: RuleSet,
}

impl QualityConfig {
    /// Parses a configuration document.
    ///
    /// An empty document is an empty configuration.
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Option<Self> = serde_yaml::from_str(content)?;
        Ok(config.unwrap_or_default())
    }

    /// Reads and parses the configuration at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = read(path)?;
        let config = Self::from_yaml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            "Loaded {} rule patterns from {}",
            config.rules.len(),
            path.display()
        );
        Ok(config)
    }
}

/// Reads a YAML or JSON list of changed files.
pub fn load_changes(path: &Path) -> Result<Vec<FileChange>, ConfigError> {
    parse_file(path)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = read(path)?;
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Returns the XDG-style global config directory for this tool.
fn xdg_config_dir() -> Option<PathBuf> {
    if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg_home.is_empty() {
            return Some(PathBuf::from(xdg_home).join("pr-quality-check"));
        }
    }

    dirs::home_dir().map(|home| home.join(".config").join("pr-quality-check"))
}

/// Resolves which configuration file to load.
///
/// Priority:
/// 1. `override_path` (from `--config`)
/// 2. `PR_QUALITY_CHECK_CONFIG` environment variable
/// 3. `.github/pr-quality-check.yml` under `repo_root`, if present
/// 4. `$XDG_CONFIG_HOME/pr-quality-check/config.yml`, if present
///
/// Falls back to the project path even when it does not exist, so the
/// subsequent read reports a meaningful location.
pub fn resolve_config_path(override_path: Option<&Path>, repo_root: &Path) -> PathBuf {
    if let Some(path) = override_path {
        return path.to_path_buf();
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        if !env_path.is_empty() {
            return PathBuf::from(env_path);
        }
    }

    let project_path = repo_root.join(PROJECT_CONFIG_PATH);
    if project_path.exists() {
        return project_path;
    }

    if let Some(global) = xdg_config_dir().map(|dir| dir.join(GLOBAL_CONFIG_FILE)) {
        if global.exists() {
            return global;
        }
    }

    project_path
}
