//! Shortcut key handling (NewChat, PrevChat/NextChat, ModelSelector, CopyReply, Quit).

use crate::core::normalize;
use crate::tui::shortcuts::Shortcut;

use super::super::app::App;
use super::HandleResult;
use super::model_selector;

pub(super) fn handle_shortcut(shortcut: Shortcut, app: &mut App) -> HandleResult {
    match shortcut {
        Shortcut::NewChat => app.new_chat_screen(),
        Shortcut::PrevChat => app.select_adjacent(-1),
        Shortcut::NextChat => app.select_adjacent(1),
        Shortcut::ModelSelector => model_selector::open_model_selector(app),
        Shortcut::CopyReply => copy_last_reply(app),
        Shortcut::Quit => return HandleResult::Break,
    }
    HandleResult::Continue
}

/// Copy the newest bot reply of the active chat, as displayed (normalized Markdown).
fn copy_last_reply(app: &mut App) {
    let Some(reply) = app.last_bot_reply() else {
        app.show_toast("Kopyalanacak yanıt yok", false);
        return;
    };
    let text = normalize::normalize(reply);
    match arboard::Clipboard::new().and_then(|mut c| c.set_text(text)) {
        Ok(()) => app.show_toast("Kopyalandı", false),
        Err(e) => {
            log::warn!("Clipboard unavailable: {}", e);
            app.show_toast(format!("Kopyalanamadı: {}", e), true);
        }
    }
}
