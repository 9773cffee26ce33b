//! Runtime configuration.
//!
//! # Responsibility
//! - Load optional TOML settings for download naming and logging.
//! - Apply `DOAPFORM_*` environment overrides on top of file values.
//!
//! # Invariants
//! - A missing config path yields defaults, never an error.
//! - Blank override values are ignored.

use log::info;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Default download basename when the project name is empty.
pub const DEFAULT_BASENAME: &str = "myproject";

pub const ENV_LOG_LEVEL: &str = "DOAPFORM_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "DOAPFORM_LOG_DIR";
pub const ENV_DEFAULT_BASENAME: &str = "DOAPFORM_DEFAULT_BASENAME";

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Basename used for downloads when the project name field is empty.
    pub default_basename: String,
    pub logging: LoggingConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            default_basename: DEFAULT_BASENAME.to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

/// File-logging settings; logging stays off while `dir` is unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub dir: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config {}: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Loads settings from `path` (if any) and applies environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<SyncConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => SyncConfig::default(),
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    info!(
        "event=config_load module=config status=ok from_file={} logging={}",
        path.is_some(),
        config.logging.dir.is_some()
    );
    Ok(config)
}

/// Parses settings from TOML text.
pub fn parse_config(path: &Path, contents: &str) -> Result<SyncConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn read_config_file(path: &Path) -> Result<SyncConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(path, &contents)
}

/// Applies overrides from a key lookup (the process environment in production).
pub fn apply_env_overrides(config: &mut SyncConfig, lookup: impl Fn(&str) -> Option<String>) {
    let non_blank = |key: &str| {
        lookup(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };
    if let Some(level) = non_blank(ENV_LOG_LEVEL) {
        config.logging.level = Some(level);
    }
    if let Some(dir) = non_blank(ENV_LOG_DIR) {
        config.logging.dir = Some(PathBuf::from(dir));
    }
    if let Some(basename) = non_blank(ENV_DEFAULT_BASENAME) {
        config.default_basename = basename;
    }
}
