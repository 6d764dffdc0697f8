//! PostgREST-backed store (`/rest/v1/chats`, `/rest/v1/messages`).

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use super::{ChatRecord, MessageRecord, Sender, StoreError};
use crate::core::auth::{self, AuthClient, Session};
use crate::core::config::SupabaseConfig;

#[derive(Serialize)]
struct NewChatRow<'a> {
    user_id: &'a str,
    chat_id: &'a str,
    title: &'a str,
}

#[derive(Serialize)]
struct NewMessageRow<'a> {
    chat_id: &'a str,
    user_id: &'a str,
    content: &'a str,
    sender: Sender,
}

/// `in.(...)` filter value with every id double-quoted.
pub(super) fn in_filter(ids: &[String]) -> String {
    let quoted: Vec<String> = ids
        .iter()
        .map(|id| format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("in.({})", quoted.join(","))
}

#[derive(Clone, Debug)]
pub struct SupabaseStore {
    http: reqwest::Client,
    config: SupabaseConfig,
    auth: AuthClient,
    /// Shared by every clone so a refresh is seen by all of them.
    session: Arc<Mutex<Session>>,
}

impl SupabaseStore {
    /// Store acting as the signed-in user (row-level security applies).
    pub fn new(config: SupabaseConfig, session: Session) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth: AuthClient::new(config.clone()),
            config,
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// Bearer token for the next request, refreshed when it is about to expire.
    pub(super) async fn access_token(&self) -> Result<String, StoreError> {
        let current = self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let fresh = auth::ensure_fresh(&self.auth, current).await?;
        let token = fresh.access_token.clone();
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = fresh;
        Ok(token)
    }

    async fn request(
        &self,
        method: reqwest::Method,
        table: &str,
    ) -> Result<reqwest::RequestBuilder, StoreError> {
        let token = self.access_token().await?;
        let url = self.config.endpoint(&format!("/rest/v1/{table}"));
        log::debug!("{method} {url}");
        Ok(self
            .http
            .request(method, url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(token))
    }

    async fn check(resp: reqwest::Response) -> Result<String, StoreError> {
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(StoreError::Rejected {
                status,
                message: body.trim().to_string(),
            });
        }
        Ok(body)
    }

    pub(super) async fn list_chats(&self, user_id: &str) -> Result<Vec<ChatRecord>, StoreError> {
        let resp = self
            .request(reqwest::Method::GET, "chats")
            .await?
            .query(&[
                ("select", "*".to_string()),
                ("user_id", format!("eq.{user_id}")),
                ("order", "created_at.asc".to_string()),
            ])
            .send()
            .await?;
        let body = Self::check(resp).await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub(super) async fn list_messages(
        &self,
        chat_ids: &[String],
    ) -> Result<Vec<MessageRecord>, StoreError> {
        let resp = self
            .request(reqwest::Method::GET, "messages")
            .await?
            .query(&[
                ("select", "*".to_string()),
                ("chat_id", in_filter(chat_ids)),
                ("order", "created_at.asc".to_string()),
            ])
            .send()
            .await?;
        let body = Self::check(resp).await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub(super) async fn insert_chat(&self, chat: &ChatRecord) -> Result<(), StoreError> {
        let resp = self
            .request(reqwest::Method::POST, "chats")
            .await?
            .header("Prefer", "return=minimal")
            .json(&NewChatRow {
                user_id: &chat.user_id,
                chat_id: &chat.chat_id,
                title: &chat.title,
            })
            .send()
            .await?;
        Self::check(resp).await.map(|_| ())
    }

    pub(super) async fn insert_message(&self, message: &MessageRecord) -> Result<(), StoreError> {
        let resp = self
            .request(reqwest::Method::POST, "messages")
            .await?
            .header("Prefer", "return=minimal")
            .json(&NewMessageRow {
                chat_id: &message.chat_id,
                user_id: &message.user_id,
                content: &message.content,
                sender: message.sender,
            })
            .send()
            .await?;
        Self::check(resp).await.map(|_| ())
    }
}
