//! Spawns one exchange (optional chat insert, user message, reply) on the runtime.

use std::sync::Arc;
use std::sync::mpsc;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::core::chat::{self, ChatContext};
use crate::core::store::{ChatRecord, MessageRecord};

use super::PendingChat;

/// Spawn a chat request. `new_chat` is inserted before the user message when the
/// send created the chat.
pub fn spawn_chat(
    rt: &Handle,
    ctx: Arc<ChatContext>,
    new_chat: Option<ChatRecord>,
    user_message: MessageRecord,
    model_id: String,
) -> PendingChat {
    let (result_tx, result_rx) = mpsc::channel();
    let cancel_token = CancellationToken::new();
    let cancel_token_clone = cancel_token.clone();

    rt.spawn(async move {
        if let Some(chat) = new_chat {
            chat::save_chat(&ctx, &chat).await;
        }
        let outcome = chat::exchange(&ctx, &user_message, &model_id, &cancel_token_clone).await;
        let _ = result_tx.send(outcome);
    });

    PendingChat {
        result_rx,
        cancel_token,
    }
}
