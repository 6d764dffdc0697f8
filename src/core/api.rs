//! Client for the chat-completion endpoint.
//!
//! One request per user message: `POST {base}/{chat_id}/{model_id}` with
//! `{"messageContent": ...}`, answered by `{"response": ...}`. No retry.

use serde::{Deserialize, Serialize};

/// Shown when the endpoint answers without a `response` field.
pub const PENDING_REPLY: &str = "API yanıtı bekleniyor";

/// Shown (and stored) in place of a reply when the request fails.
pub const FALLBACK_REPLY: &str = "Bir hata oluştu, lütfen tekrar deneyin.";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Invalid API response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    #[serde(rename = "messageContent")]
    message_content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    response: Option<String>,
}

/// Extract the reply text from a response body. A missing, null or empty
/// `response` yields the pending placeholder.
pub fn parse_reply(body: &str) -> Result<String, ApiError> {
    let parsed: CompletionResponse = serde_json::from_str(body)?;
    Ok(parsed
        .response
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| PENDING_REPLY.to_string()))
}

#[derive(Clone, Debug)]
pub struct CompletionClient {
    http: reqwest::Client,
    base_url: String,
}

impl CompletionClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// URL for one chat/model pair.
    pub fn endpoint(&self, chat_id: &str, model_id: &str) -> String {
        format!("{}/{}/{}", self.base_url, chat_id, model_id)
    }

    /// Send one user message and return the raw (unnormalized) reply.
    pub async fn send_message(
        &self,
        chat_id: &str,
        model_id: &str,
        content: &str,
    ) -> Result<String, ApiError> {
        let url = self.endpoint(chat_id, model_id);
        log::debug!("POST {url} ({} chars)", content.chars().count());
        let resp = self
            .http
            .post(&url)
            .json(&CompletionRequest {
                message_content: content,
            })
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status { status, body });
        }
        parse_reply(&body)
    }
}
