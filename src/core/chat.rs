//! Chat flow shared by the CLI and the dashboard: pick the backend for the current
//! user, load their chats, create chats and exchange one message with the API.
//!
//! Persistence failures never abort a conversation; they are logged.

use std::collections::HashMap;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::core::api::{self, CompletionClient};
use crate::core::auth::{self, AuthClient, AuthError};
use crate::core::config::Config;
use crate::core::store::{
    self, ChatRecord, LOCAL_USER_ID, LocalStore, MessageRecord, Sender, Store, StoreError,
    SupabaseStore,
};

#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Everything needed to talk to the API and persist on behalf of one user.
#[derive(Clone, Debug)]
pub struct ChatContext {
    pub api: CompletionClient,
    pub store: Store,
    pub user_id: String,
    /// Signed-in email; `None` for the local store.
    pub email: Option<String>,
}

/// Resolve the backend: Supabase (requires a stored session) when configured,
/// otherwise the local store.
pub async fn connect(config: &Config) -> Result<ChatContext, ConnectError> {
    let api = CompletionClient::new(&config.api_url);
    let Some(supabase) = &config.supabase else {
        let local = LocalStore::open_default()?;
        log::info!("Using local chat store at {}", local.dir().display());
        return Ok(ChatContext {
            api,
            store: Store::Local(local),
            user_id: LOCAL_USER_ID.to_string(),
            email: None,
        });
    };
    let client = AuthClient::new(supabase.clone());
    let session = auth::get_session(&client)
        .await?
        .ok_or(AuthError::NotSignedIn)?;
    log::info!("Using Supabase chat store as {}", session.email());
    Ok(ChatContext {
        api,
        store: Store::Supabase(SupabaseStore::new(supabase.clone(), session.clone())),
        user_id: session.user.id.clone(),
        email: session.user.email.clone(),
    })
}

/// Chats (oldest first) and their messages grouped by chat id.
pub async fn load_history(
    ctx: &ChatContext,
) -> Result<(Vec<ChatRecord>, HashMap<String, Vec<MessageRecord>>), StoreError> {
    let chats = ctx.store.list_chats(&ctx.user_id).await?;
    let ids: Vec<String> = chats.iter().map(|c| c.chat_id.clone()).collect();
    let messages = ctx.store.list_messages(&ids).await?;
    Ok((chats, store::group_by_chat(messages)))
}

/// Persist a chat record; a failure is logged and the chat stays usable.
pub async fn save_chat(ctx: &ChatContext, chat: &ChatRecord) {
    if let Err(e) = ctx.store.insert_chat(chat).await {
        log::error!("Failed to save chat {}: {}", chat.chat_id, e);
    }
}

/// Create and persist a new chat numbered after `existing` chats.
pub async fn create_chat(ctx: &ChatContext, existing: usize) -> ChatRecord {
    let chat = ChatRecord::new(&ctx.user_id, existing, Utc::now());
    save_chat(ctx, &chat).await;
    chat
}

async fn persist(ctx: &ChatContext, message: &MessageRecord) {
    if let Err(e) = ctx.store.insert_message(message).await {
        log::error!(
            "Failed to save {} message in {}: {}",
            message.sender.as_str(),
            message.chat_id,
            e
        );
    }
}

/// How one exchange ended.
#[derive(Debug)]
pub enum ReplyOutcome {
    /// The API answered; the raw reply is stored.
    Reply(MessageRecord),
    /// The request failed; the fallback message is stored in its place.
    Failed(MessageRecord, String),
    /// Cancelled by the user; nothing stored.
    Cancelled,
}

/// Persist the user message, ask the API, persist the reply (or the fallback).
pub async fn exchange(
    ctx: &ChatContext,
    user_message: &MessageRecord,
    model_id: &str,
    cancel: &CancellationToken,
) -> ReplyOutcome {
    persist(ctx, user_message).await;

    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            log::info!("Request for {} cancelled", user_message.chat_id);
            return ReplyOutcome::Cancelled;
        }
        r = ctx.api.send_message(&user_message.chat_id, model_id, &user_message.content) => r,
    };

    match result {
        Ok(reply) => {
            let bot = MessageRecord::new(&user_message.chat_id, &ctx.user_id, Sender::Bot, &reply);
            persist(ctx, &bot).await;
            ReplyOutcome::Reply(bot)
        }
        Err(e) => {
            log::error!("Completion request failed: {e}");
            let bot = MessageRecord::new(
                &user_message.chat_id,
                &ctx.user_id,
                Sender::Bot,
                api::FALLBACK_REPLY,
            );
            persist(ctx, &bot).await;
            ReplyOutcome::Failed(bot, e.to_string())
        }
    }
}
