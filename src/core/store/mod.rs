//! Persistence of chats and their messages.
//!
//! Two insert-only record kinds. With Supabase configured they live in the
//! `chats` and `messages` tables (PostgREST); otherwise in JSON files under the
//! data directory.

mod local;
mod supabase;

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

pub use local::LocalStore;
pub use supabase::SupabaseStore;

/// User id of every record in the local store.
pub const LOCAL_USER_ID: &str = "local";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

/// Row timestamps: RFC 3339, or a column without offset (taken as UTC).
/// `null` reads as now, like a missing field.
fn lenient_timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
    let Some(raw) = Option::<String>::deserialize(d)? else {
        return Ok(Utc::now());
    };
    parse_timestamp(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp '{raw}'")))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    // Postgres text output uses a space and short offsets ("+00").
    for fmt in ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"] {
        if let Ok(t) = DateTime::parse_from_str(raw, fmt) {
            return Some(t.with_timezone(&Utc));
        }
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|t| t.and_utc())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub user_id: String,
    pub chat_id: String,
    /// Empty when the row has no title; see [`ChatRecord::label`].
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default = "Utc::now", deserialize_with = "lenient_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl ChatRecord {
    /// A new chat for `user_id`; the title numbers it after the existing ones.
    pub fn new(user_id: &str, existing: usize, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_string(),
            chat_id: format!("chat-{}", now.timestamp_millis()),
            title: format!("Chat {}", existing + 1),
            created_at: now,
        }
    }

    /// Sidebar label: the title, or a shortened id when the title is empty.
    pub fn label(&self) -> String {
        if !self.title.trim().is_empty() {
            return self.title.clone();
        }
        let short: String = self.chat_id.chars().take(8).collect();
        format!("Chat {short}...")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub chat_id: String,
    pub user_id: String,
    pub content: String,
    pub sender: Sender,
    #[serde(default = "Utc::now", deserialize_with = "lenient_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl MessageRecord {
    pub fn new(chat_id: &str, user_id: &str, sender: Sender, content: &str) -> Self {
        Self {
            chat_id: chat_id.to_string(),
            user_id: user_id.to_string(),
            content: content.to_string(),
            sender,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("No data directory available")]
    NoDataDir,
    #[error("Invalid chat id '{0}'")]
    InvalidChatId(String),
    #[error("Chat '{0}' already exists")]
    DuplicateChat(String),
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid stored data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Database request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Session refresh failed: {0}")]
    Auth(#[from] crate::core::auth::AuthError),
    #[error("Database error {status}: {message}")]
    Rejected {
        status: reqwest::StatusCode,
        message: String,
    },
}

/// Where chats are kept. Enum dispatch keeps the async methods free of boxing.
#[derive(Clone, Debug)]
pub enum Store {
    Local(LocalStore),
    Supabase(SupabaseStore),
}

impl Store {
    /// Chats of one user, oldest first.
    pub async fn list_chats(&self, user_id: &str) -> Result<Vec<ChatRecord>, StoreError> {
        match self {
            Store::Local(s) => s.list_chats(user_id),
            Store::Supabase(s) => s.list_chats(user_id).await,
        }
    }

    /// Messages of the given chats, oldest first.
    pub async fn list_messages(
        &self,
        chat_ids: &[String],
    ) -> Result<Vec<MessageRecord>, StoreError> {
        if chat_ids.is_empty() {
            return Ok(Vec::new());
        }
        match self {
            Store::Local(s) => s.list_messages(chat_ids),
            Store::Supabase(s) => s.list_messages(chat_ids).await,
        }
    }

    pub async fn insert_chat(&self, chat: &ChatRecord) -> Result<(), StoreError> {
        log::debug!("Inserting chat {} ({})", chat.chat_id, chat.title);
        match self {
            Store::Local(s) => s.insert_chat(chat),
            Store::Supabase(s) => s.insert_chat(chat).await,
        }
    }

    pub async fn insert_message(&self, message: &MessageRecord) -> Result<(), StoreError> {
        log::debug!(
            "Inserting {} message into {}",
            message.sender.as_str(),
            message.chat_id
        );
        match self {
            Store::Local(s) => s.insert_message(message),
            Store::Supabase(s) => s.insert_message(message).await,
        }
    }

    /// Short name for status lines.
    pub fn backend_name(&self) -> &'static str {
        match self {
            Store::Local(_) => "local",
            Store::Supabase(_) => "supabase",
        }
    }
}

/// Group messages by chat id, keeping their order.
pub fn group_by_chat(messages: Vec<MessageRecord>) -> HashMap<String, Vec<MessageRecord>> {
    let mut by_chat: HashMap<String, Vec<MessageRecord>> = HashMap::new();
    for m in messages {
        by_chat.entry(m.chat_id.clone()).or_default().push(m);
    }
    by_chat
}

#[cfg(test)]
mod tests;
