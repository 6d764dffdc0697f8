//! Centralized path helpers for config, cache, and data directories.

use std::path::PathBuf;

use crate::core::app;

/// Project directories (config, cache, data) from the standard platform locations.
pub fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("io", app::VENDOR, app::NAME)
}

/// Config directory (~/.config/chatburak/).
/// Tests may set `TEST_CONFIG_DIR` to redirect it.
pub fn config_dir() -> Option<PathBuf> {
    if let Some(p) = std::env::var_os("TEST_CONFIG_DIR") {
        return Some(PathBuf::from(p));
    }
    project_dirs().map(|d| d.config_dir().to_path_buf())
}

/// Cache directory (~/.cache/chatburak/).
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|d| d.cache_dir().to_path_buf())
}

/// Data directory for locally stored chats (~/.local/share/chatburak/chats/).
/// Tests may set `TEST_DATA_DIR` to redirect it.
pub fn data_dir() -> Option<PathBuf> {
    if let Some(p) = std::env::var_os("TEST_DATA_DIR") {
        return Some(PathBuf::from(p));
    }
    project_dirs().map(|d| d.data_dir().join("chats"))
}
