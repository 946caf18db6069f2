//! XDG directory helpers for config/data locations.

use std::path::PathBuf;

/// Base directory for persistent data (the file storage backend).
///
/// Uses `SF_DATA_DIR` if set, otherwise `$XDG_DATA_HOME/storefront-rs` or
/// `~/.local/share/storefront-rs`.
pub(crate) fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SF_DATA_DIR")
        && !dir.trim().is_empty()
    {
        return PathBuf::from(dir);
    }

    std::env::var("XDG_DATA_HOME")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("/tmp"))
                .join(".local")
                .join("share")
        })
        .join("storefront-rs")
}

/// Root directory for the file storage backend.
pub fn storage_dir() -> PathBuf {
    data_dir().join("storage")
}

/// Base directory for configuration files.
///
/// Uses `SF_CONFIG_DIR` if set, otherwise `$XDG_CONFIG_HOME/storefront-rs` or
/// `~/.config/storefront-rs`.
pub(crate) fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SF_CONFIG_DIR")
        && !dir.trim().is_empty()
    {
        return PathBuf::from(dir);
    }

    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("/tmp"))
                .join(".config")
        })
        .join("storefront-rs")
}
