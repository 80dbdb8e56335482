//! Path utilities for roasbot.
//!
//! Configuration lives under `~/.roasbot/`:
//! - `~/.roasbot/config.toml` - main configuration

use std::path::{Path, PathBuf};

/// Returns the roasbot home directory (`~/.roasbot/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".roasbot")
}

/// Returns the default config file path (`~/.roasbot/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

/// Ensures the parent directory of a database file exists.
pub fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
