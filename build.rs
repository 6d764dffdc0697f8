//! Build script: validates model presets in config/models.json at compile time.

use std::collections::HashSet;
use std::path::PathBuf;

fn main() {
    let manifest_dir =
        std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR set by Cargo");
    let config_path: PathBuf = [&manifest_dir, "config", "models.json"].iter().collect();
    println!("cargo:rerun-if-changed={}", config_path.display());
    let json = std::fs::read_to_string(&config_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read {}: {}. models.json must exist and be valid.",
            config_path.display(),
            e
        )
    });
    #[derive(serde::Deserialize)]
    struct ModelPresetEntry {
        id: String,
        name: String,
        #[allow(dead_code)]
        description: String,
    }
    let presets: Vec<ModelPresetEntry> = serde_json::from_str(&json).unwrap_or_else(|e| {
        panic!(
            "models.json is invalid JSON: {}. Fix the file and rebuild.",
            e
        )
    });
    if presets.is_empty() {
        panic!("models.json must declare at least one model preset");
    }
    let mut seen = HashSet::new();
    for p in &presets {
        if p.id.trim().is_empty() || p.name.trim().is_empty() {
            panic!("models.json: every preset needs a non-empty id and name");
        }
        if p.id.contains('/') {
            panic!("models.json: preset id '{}' must not contain '/'", p.id);
        }
        if !seen.insert(p.id.as_str()) {
            panic!("models.json: duplicate preset id '{}'", p.id);
        }
    }
}
