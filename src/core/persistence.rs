//! Persistence of user preferences (the last selected model) in the config directory.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::core::paths;

fn last_model_path() -> Option<PathBuf> {
    paths::config_dir().map(|d| d.join("last_model"))
}

/// Load the last used model preset id, if the file exists and is non-empty.
pub fn load_last_model() -> Option<String> {
    let path = last_model_path()?;
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Save the last used model preset id. Creates the config directory if needed.
pub fn save_last_model(model_id: &str) -> io::Result<()> {
    let path = last_model_path()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No config directory"))?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, model_id)
}
