//! Runtime configuration from the environment (`.env` is loaded by `main`).

use std::env;

use crate::core::{models, persistence};

/// Endpoint the completion requests go to unless `CHATBURAK_API_URL` overrides it.
pub const DEFAULT_API_URL: &str = "https://bdere-api.foreverplayerstudios.workers.dev";

/// Supabase project the auth and chat store talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

impl SupabaseConfig {
    /// Join a path such as `/auth/v1/signup` onto the project URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub model_id: String,
    pub supabase: Option<SupabaseConfig>,
    pub show_timestamps: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown model '{0}' (run `chatburak models` to list presets)")]
    UnknownModel(String),
    #[error("SUPABASE_URL and SUPABASE_ANON_KEY must be set together")]
    IncompleteSupabase,
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Load configuration from the environment.
///
/// The model comes from `CHATBURAK_MODEL`, else the last model picked in the TUI,
/// else the first preset. A stale persisted id falls back to the default; an
/// explicit unknown id is an error.
pub fn load() -> Result<Config, ConfigError> {
    let api_url = non_empty_var("CHATBURAK_API_URL")
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
        .trim_end_matches('/')
        .to_string();

    let model_id = match non_empty_var("CHATBURAK_MODEL") {
        Some(id) => {
            if models::find(&id).is_none() {
                return Err(ConfigError::UnknownModel(id));
            }
            id
        }
        None => persistence::load_last_model()
            .filter(|id| models::find(id).is_some())
            .unwrap_or_else(|| models::default_preset().id.clone()),
    };

    let supabase = match (
        non_empty_var("SUPABASE_URL"),
        non_empty_var("SUPABASE_ANON_KEY"),
    ) {
        (Some(url), Some(anon_key)) => Some(SupabaseConfig { url, anon_key }),
        (None, None) => None,
        _ => return Err(ConfigError::IncompleteSupabase),
    };

    let show_timestamps = non_empty_var("CHATBURAK_SHOW_TIMESTAMPS")
        .and_then(|v| {
            let parsed = parse_flag(&v);
            if parsed.is_none() {
                log::warn!("Ignoring CHATBURAK_SHOW_TIMESTAMPS={v:?}; expected true or false");
            }
            parsed
        })
        .unwrap_or(true);

    Ok(Config {
        api_url,
        model_id,
        supabase,
        show_timestamps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_flag_accepts_common_spellings() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn supabase_endpoint_joins_without_double_slash() {
        let cfg = SupabaseConfig {
            url: "https://abc.supabase.co/".into(),
            anon_key: "anon".into(),
        };
        assert_eq!(
            cfg.endpoint("/rest/v1/chats"),
            "https://abc.supabase.co/rest/v1/chats"
        );
    }
}
