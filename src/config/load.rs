use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::error::Transience;
use crate::paths;

use super::merge::{apply_env_overrides, merge_layers};
use super::{Config, ConfigLayer};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read {path}: {reason}")]
    Read { path: PathBuf, reason: String },
    #[error("failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
    #[error("failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}

impl ConfigError {
    pub fn transience(&self) -> Transience {
        Transience::Permanent
    }
}

pub fn config_path() -> PathBuf {
    paths::config_dir().join("config.toml")
}

pub fn load_user_config() -> Result<Option<ConfigLayer>, ConfigError> {
    load_layer(&config_path())
}

fn load_layer(path: &Path) -> Result<Option<ConfigLayer>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    toml::from_str(&contents)
        .map(Some)
        .map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Resolve the effective config: defaults, then the user layer, then env
/// overrides.
pub fn load() -> Result<Config, ConfigError> {
    let user = load_user_config()?;
    let mut config = merge_layers(user);
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Like [`load`], but never fails: a broken config warns and falls back to
/// defaults, and a default `config.toml` is written on first run.
pub fn load_or_init() -> Config {
    let path = config_path();
    let had_user_config = path.exists();

    let config = match load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("config load failed, using defaults: {e}");
            let mut config = Config::default();
            apply_env_overrides(&mut config);
            config
        }
    };

    if !had_user_config
        && let Err(e) = write_config(&path, &Config::default())
    {
        tracing::warn!("failed to write default config: {e}");
    }

    config
}

pub fn write_config(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| ConfigError::Write {
            path: dir.to_path_buf(),
            reason: format!("failed to create directory: {e}"),
        })?;
    }
    let contents = toml::to_string_pretty(config).map_err(|e| ConfigError::Write {
        path: path.to_path_buf(),
        reason: format!("failed to render config: {e}"),
    })?;
    atomic_write(path, contents.as_bytes())
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<(), ConfigError> {
    let dir = path.parent().ok_or_else(|| ConfigError::Write {
        path: path.to_path_buf(),
        reason: "config path missing parent directory".to_string(),
    })?;
    let write_error = |reason: String| ConfigError::Write {
        path: path.to_path_buf(),
        reason,
    };

    let temp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| write_error(format!("failed to create temp file: {e}")))?;
    fs::write(temp.path(), data)
        .map_err(|e| write_error(format!("failed to write temp file: {e}")))?;
    temp.persist(path)
        .map_err(|e| write_error(format!("failed to persist: {e}")))?;
    Ok(())
}
