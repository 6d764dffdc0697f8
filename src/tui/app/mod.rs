//! TUI application state: chats, active chat, input, scroll, popups.

mod messages;

use std::collections::HashMap;
use std::time::Instant;

use ratatui::layout::Rect;
use ratatui::widgets::ListState;

use crate::core::store::{ChatRecord, MessageRecord};

/// State for the model selector popup.
pub struct ModelSelectorState {
    pub selected_index: usize,
    pub list_state: ListState,
    /// Filter query (case-insensitive search on model id/name).
    pub filter: String,
}

/// Sidebar list state and the areas last drawn, for mouse hit testing.
#[derive(Default)]
pub(crate) struct SidebarState {
    pub list_state: ListState,
    pub list_rect: Option<Rect>,
    pub new_chat_rect: Option<Rect>,
}

/// Scroll position: either a specific line index, or "at bottom" (follow new content).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollPosition {
    Line(usize),
    Bottom,
}

impl Default for ScrollPosition {
    fn default() -> Self {
        Self::Line(0)
    }
}

/// Short-lived message in the top right corner.
pub(crate) struct Toast {
    pub text: String,
    pub is_error: bool,
    pub until: Instant,
}

pub struct App {
    /// Chats of the current user, oldest first (the sidebar shows them reversed).
    pub(crate) chats: Vec<ChatRecord>,
    /// Messages per chat id, in insertion order.
    pub(crate) messages_by_chat: HashMap<String, Vec<MessageRecord>>,
    /// Chat shown in the chat window; `None` is the new chat screen.
    pub(crate) active_chat: Option<String>,
    /// Chat whose reply is being awaited; drives the loading spinner.
    pub(crate) waiting_chat: Option<String>,
    /// User input in the text field.
    pub(crate) input: String,
    /// Cursor position in the input (byte index; used for Left/Right, insert, Backspace).
    pub(crate) input_cursor: usize,
    pub(crate) scroll: ScrollPosition,
    pub(crate) last_max_scroll: usize,
    /// Index of the selected suggestion chip (Tab to cycle).
    pub selected_suggestion: usize,
    /// Display name of the selected model (header).
    pub model_name: String,
    /// Model id sent to the completion endpoint.
    pub current_model_id: String,
    /// When set, show model selector popup (Alt+M).
    pub model_selector: Option<ModelSelectorState>,
    /// Signed-in email shown in the header; `None` with the local store.
    pub(crate) email: Option<String>,
    /// Store backend shown in the bottom bar ("local" or "supabase").
    pub(crate) backend: &'static str,
    pub(crate) sidebar: SidebarState,
    /// Whether to show HH:MM next to message labels (from CHATBURAK_SHOW_TIMESTAMPS).
    pub(crate) show_timestamps: bool,
    pub(crate) toast: Option<Toast>,
    /// Esc was pressed; next key = Option+key (Mac terminals with "Use option as meta").
    pub(crate) escape_pending: bool,
}

impl App {
    pub fn new(
        model_id: String,
        model_name: String,
        email: Option<String>,
        backend: &'static str,
        show_timestamps: bool,
    ) -> Self {
        Self {
            chats: vec![],
            messages_by_chat: HashMap::new(),
            active_chat: None,
            waiting_chat: None,
            input: String::new(),
            input_cursor: 0,
            scroll: ScrollPosition::default(),
            last_max_scroll: 0,
            selected_suggestion: 0,
            model_name,
            current_model_id: model_id,
            model_selector: None,
            email,
            backend,
            sidebar: SidebarState::default(),
            show_timestamps,
            toast: None,
            escape_pending: false,
        }
    }

    pub(crate) fn is_waiting(&self) -> bool {
        self.waiting_chat.is_some()
    }

    pub(crate) fn show_toast(&mut self, text: impl Into<String>, is_error: bool) {
        let ttl = std::time::Duration::from_secs(super::constants::TOAST_SECS);
        self.toast = Some(Toast {
            text: text.into(),
            is_error,
            until: Instant::now() + ttl,
        });
    }

    /// Replace the input text and move the cursor to its end.
    pub(crate) fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
        self.input_cursor = self.input.len();
    }

    pub(crate) fn clear_input(&mut self) {
        self.input.clear();
        self.input_cursor = 0;
    }

    /// Must be called before scroll_up/scroll_down when at bottom.
    pub(crate) fn materialize_scroll(&mut self) {
        if self.scroll == ScrollPosition::Bottom {
            self.scroll = ScrollPosition::Line(self.last_max_scroll);
        }
    }

    pub(crate) fn scroll_down(&mut self, n: usize) {
        self.materialize_scroll();
        if let ScrollPosition::Line(pos) = self.scroll {
            self.scroll = ScrollPosition::Line((pos + n).min(self.last_max_scroll));
        }
    }

    pub(crate) fn scroll_up(&mut self, n: usize) {
        self.materialize_scroll();
        if let ScrollPosition::Line(pos) = self.scroll {
            self.scroll = ScrollPosition::Line(pos.saturating_sub(n));
        }
    }

    /// Resolve scroll position to a concrete line index.
    pub(crate) fn scroll_line(&self) -> usize {
        match self.scroll {
            ScrollPosition::Line(n) => n.min(self.last_max_scroll),
            ScrollPosition::Bottom => self.last_max_scroll,
        }
    }
}
