//! Handler for main input (chat input, suggestions, scroll) and sending.

use std::sync::Arc;

use chrono::Utc;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::runtime::Handle;

use crate::core::chat::ChatContext;
use crate::core::store::{ChatRecord, MessageRecord, Sender};

use super::super::app::App;
use super::super::constants::{self, SUGGESTIONS};
use super::chat_spawn;
use super::{HandleResult, PendingChat};

/// Handle main input keys (when no popup is open).
pub(crate) fn handle_main_input(
    key_code: KeyCode,
    key_modifiers: KeyModifiers,
    app: &mut App,
    ctx: &Arc<ChatContext>,
    pending_chat: &mut Option<PendingChat>,
    rt: &Handle,
) -> HandleResult {
    let newline_mods = KeyModifiers::ALT | KeyModifiers::SHIFT;
    match (key_code, key_modifiers) {
        (KeyCode::Enter, mods) if mods.intersects(newline_mods) => insert_char(app, '\n'),
        (KeyCode::Enter, _) => {
            if pending_chat.is_none() {
                if app.input.trim().is_empty() && app.is_welcome() {
                    app.set_input(SUGGESTIONS[app.selected_suggestion]);
                }
                if let Some(pc) = send(app, ctx, rt) {
                    *pending_chat = Some(pc);
                }
            }
        }
        (KeyCode::BackTab, _) | (KeyCode::Tab, KeyModifiers::SHIFT) => {
            if app.is_welcome() {
                app.selected_suggestion =
                    (app.selected_suggestion + SUGGESTIONS.len() - 1) % SUGGESTIONS.len();
            }
        }
        (KeyCode::Tab, _) => {
            if app.is_welcome() {
                app.selected_suggestion = (app.selected_suggestion + 1) % SUGGESTIONS.len();
            }
        }
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => app.clear_input(),
        (KeyCode::Backspace, _) => {
            if app.input_cursor > 0 {
                let prev = app.input.floor_char_boundary(app.input_cursor - 1);
                app.input.replace_range(prev..app.input_cursor, "");
                app.input_cursor = prev;
            }
        }
        (KeyCode::Delete, _) => {
            if app.input_cursor < app.input.len() {
                let next = app.input.ceil_char_boundary(app.input_cursor + 1);
                app.input.replace_range(app.input_cursor..next, "");
            }
        }
        (KeyCode::Left, _) => {
            if app.input_cursor > 0 {
                app.input_cursor = app.input.floor_char_boundary(app.input_cursor - 1);
            }
        }
        (KeyCode::Right, _) => {
            if app.input_cursor < app.input.len() {
                app.input_cursor = app.input.ceil_char_boundary(app.input_cursor + 1);
            }
        }
        (KeyCode::Home, _) => app.input_cursor = 0,
        (KeyCode::End, _) => app.input_cursor = app.input.len(),
        (KeyCode::Up, _) => app.scroll_up(constants::SCROLL_LINES_SMALL),
        (KeyCode::Down, _) => app.scroll_down(constants::SCROLL_LINES_SMALL),
        (KeyCode::PageUp, _) => app.scroll_up(constants::SCROLL_LINES_PAGE),
        (KeyCode::PageDown, _) => app.scroll_down(constants::SCROLL_LINES_PAGE),
        (KeyCode::Char(c), mods) => {
            // Ignore Alt/Ctrl+key: user likely intended a shortcut
            if !mods.intersects(KeyModifiers::ALT | KeyModifiers::CONTROL) {
                insert_char(app, c);
            }
        }
        _ => {}
    }
    HandleResult::Continue
}

fn insert_char(app: &mut App, c: char) {
    let at = app.input.floor_char_boundary(app.input_cursor.min(app.input.len()));
    app.input.insert(at, c);
    app.input_cursor = at + c.len_utf8();
}

/// Append the typed message to the active chat (creating the chat first when
/// none is active) and spawn the request. `None` when there is nothing to send.
fn send(app: &mut App, ctx: &Arc<ChatContext>, rt: &Handle) -> Option<PendingChat> {
    let text = app.input.trim().to_string();
    if text.is_empty() {
        return None;
    }

    let new_chat = match app.active_chat {
        Some(_) => None,
        None => {
            let chat = ChatRecord::new(&ctx.user_id, app.chats.len(), Utc::now());
            log::info!("Creating {} ({})", chat.chat_id, chat.title);
            app.add_chat(chat.clone());
            Some(chat)
        }
    };
    let chat_id = app.active_chat.clone()?;

    let user_message = MessageRecord::new(&chat_id, &ctx.user_id, Sender::User, &text);
    app.push_message(user_message.clone());
    app.clear_input();
    app.waiting_chat = Some(chat_id);

    Some(chat_spawn::spawn_chat(
        rt,
        Arc::clone(ctx),
        new_chat,
        user_message,
        app.current_model_id.clone(),
    ))
}
