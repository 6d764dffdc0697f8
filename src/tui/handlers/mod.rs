//! Event handlers for the TUI: keyboard and mouse.

mod chat_spawn;
mod input;
mod model_selector;
mod shortcuts;

use std::sync::Arc;
use std::sync::mpsc;

use crossterm::event::{KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::core::chat::{ChatContext, ReplyOutcome};

use super::app::App;
use super::constants;
use super::shortcuts::Shortcut;

use self::shortcuts::handle_shortcut;

/// A request in flight: its outcome arrives on `result_rx`.
pub struct PendingChat {
    pub result_rx: mpsc::Receiver<ReplyOutcome>,
    /// Token to cancel the in-flight request.
    pub cancel_token: CancellationToken,
}

/// Result of handling an event: continue the loop or exit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleResult {
    Continue,
    Break,
}

/// True when Esc would start Option+key (escape_pending) rather than cancel/close.
pub(crate) fn would_esc_start_meta_sequence(
    key: &KeyEvent,
    app: &App,
    pending_chat: &Option<PendingChat>,
) -> bool {
    Shortcut::is_escape(key) && app.model_selector.is_none() && pending_chat.is_none()
}

/// Handle a mouse event: wheel scrolls the history, clicks pick sidebar entries.
pub fn handle_mouse(mouse: MouseEvent, app: &mut App) -> HandleResult {
    if app.model_selector.is_some() {
        return HandleResult::Continue;
    }
    let pos = Position::new(mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if app.sidebar.new_chat_rect.is_some_and(|r| r.contains(pos)) {
                app.new_chat_screen();
            } else if let Some(rect) = app.sidebar.list_rect
                && rect.contains(pos)
            {
                let row = (pos.y - rect.y) as usize + app.sidebar.list_state.offset();
                let picked = app.sidebar_chats().nth(row).map(|c| c.chat_id.clone());
                if let Some(id) = picked {
                    app.select_chat(&id);
                }
            }
        }
        MouseEventKind::ScrollUp => app.scroll_up(constants::SCROLL_LINES_SMALL),
        MouseEventKind::ScrollDown => app.scroll_down(constants::SCROLL_LINES_SMALL),
        _ => {}
    }
    HandleResult::Continue
}

/// Context for key event handling. Bundles mutable state to reduce parameter count.
pub struct HandleKeyContext<'a> {
    pub app: &'a mut App,
    pub ctx: &'a Arc<ChatContext>,
    pub pending_chat: &'a mut Option<PendingChat>,
    pub rt: &'a Handle,
}

/// Handle a key event. Returns HandleResult::Break to exit the main loop.
pub fn handle_key(key: KeyEvent, hk: HandleKeyContext<'_>) -> HandleResult {
    let HandleKeyContext {
        app,
        ctx,
        pending_chat,
        rt,
    } = hk;

    if key.kind != KeyEventKind::Press {
        return HandleResult::Continue;
    }

    // Esc+key sequence (Option as Meta on Mac terminals)
    if app.escape_pending {
        app.escape_pending = false;
        if let Some(shortcut) = Shortcut::match_key(&key, true) {
            return handle_shortcut(shortcut, app);
        }
    }

    if let Some(shortcut) = Shortcut::match_key(&key, false) {
        // Only Quit works while the model selector is open; other shortcuts would act behind it.
        if shortcut == Shortcut::Quit || app.model_selector.is_none() {
            return handle_shortcut(shortcut, app);
        }
    }

    if app.model_selector.is_some() {
        return model_selector::handle_model_selector(key.code, key.modifiers, app);
    }

    // Esc: cancel the in-flight request, else start an Option+key sequence.
    if Shortcut::is_escape(&key) {
        if let Some(pc) = pending_chat.as_ref() {
            pc.cancel_token.cancel();
        } else {
            app.escape_pending = true;
        }
        return HandleResult::Continue;
    }

    input::handle_main_input(key.code, key.modifiers, app, ctx, pending_chat, rt)
}
