//! Model presets offered by the completion endpoint.
//!
//! The menu is fixed and ships in `config/models.json` (embedded at compile time,
//! validated by `build.rs`). The first entry is the default.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// One selectable model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelPreset {
    pub id: String,
    pub name: String,
    pub description: String,
}

fn load_presets() -> Vec<ModelPreset> {
    let json = include_str!("../../config/models.json");
    serde_json::from_str(json).expect("models.json is validated by build.rs")
}

static PRESETS: OnceLock<Vec<ModelPreset>> = OnceLock::new();

/// All presets, in menu order.
pub fn presets() -> &'static [ModelPreset] {
    PRESETS.get_or_init(load_presets)
}

/// The preset used when nothing else is selected.
pub fn default_preset() -> &'static ModelPreset {
    &presets()[0]
}

/// Look up a preset by exact id.
pub fn find(id: &str) -> Option<&'static ModelPreset> {
    presets().iter().find(|p| p.id == id)
}

/// Filter presets by query (case-insensitive match on id or name).
pub fn filter_presets<'a>(presets: &'a [ModelPreset], query: &str) -> Vec<&'a ModelPreset> {
    if query.is_empty() {
        return presets.iter().collect();
    }
    let q = query.to_lowercase();
    presets
        .iter()
        .filter(|m| m.id.to_lowercase().contains(&q) || m.name.to_lowercase().contains(&q))
        .collect()
}

/// Resolve a model id to its display name; unknown ids are shown as-is.
pub fn display_name(id: &str) -> String {
    find(id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_first_preset() {
        assert_eq!(default_preset().id, "claude3-sonnet");
        assert_eq!(presets().len(), 4);
    }

    #[test]
    fn find_and_display_name() {
        assert_eq!(find("o1").map(|p| p.name.as_str()), Some("O1"));
        assert!(find("gpt-4").is_none());
        assert_eq!(display_name("o3-mini-high"), "O3 Mini High");
        assert_eq!(display_name("custom"), "custom");
    }

    #[test]
    fn filter_matches_id_or_name() {
        let all = presets();
        assert_eq!(filter_presets(all, "").len(), all.len());
        let thinking: Vec<&str> = filter_presets(all, "THINK")
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(thinking, ["claude3-sonnet-thinking"]);
        let sonnet = filter_presets(all, "sonnet");
        assert_eq!(sonnet.len(), 2);
    }
}
