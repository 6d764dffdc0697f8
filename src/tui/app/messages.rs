//! Chat and message bookkeeping: sidebar order, selection, appending records.

use std::collections::HashMap;

use crate::core::store::{ChatRecord, MessageRecord, Sender};

use super::{App, ScrollPosition};

impl App {
    /// Load the chats and messages read from the store at startup.
    pub(crate) fn set_history(
        &mut self,
        chats: Vec<ChatRecord>,
        messages_by_chat: HashMap<String, Vec<MessageRecord>>,
    ) {
        self.chats = chats;
        self.messages_by_chat = messages_by_chat;
        self.active_chat = None;
        self.scroll = ScrollPosition::default();
    }

    /// Chats in sidebar order: newest first.
    pub(crate) fn sidebar_chats(&self) -> impl Iterator<Item = &ChatRecord> {
        self.chats.iter().rev()
    }

    /// Sidebar row of the active chat, if any.
    pub(crate) fn selected_row(&self) -> Option<usize> {
        let active = self.active_chat.as_deref()?;
        self.sidebar_chats().position(|c| c.chat_id == active)
    }

    /// Messages of the active chat (empty on the new chat screen).
    pub(crate) fn active_messages(&self) -> &[MessageRecord] {
        self.active_chat
            .as_ref()
            .and_then(|id| self.messages_by_chat.get(id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// True when the welcome screen should be drawn instead of the history.
    pub(crate) fn is_welcome(&self) -> bool {
        self.active_messages().is_empty() && !self.is_waiting_on_active()
    }

    /// True when the active chat is the one waiting for a reply.
    pub(crate) fn is_waiting_on_active(&self) -> bool {
        self.waiting_chat.is_some() && self.waiting_chat == self.active_chat
    }

    pub(crate) fn select_chat(&mut self, chat_id: &str) {
        if self.active_chat.as_deref() != Some(chat_id) {
            self.active_chat = Some(chat_id.to_string());
            self.scroll = ScrollPosition::Bottom;
        }
    }

    /// Show the new chat screen; the next send creates a chat.
    pub(crate) fn new_chat_screen(&mut self) {
        self.active_chat = None;
        self.scroll = ScrollPosition::default();
        self.last_max_scroll = 0;
        self.selected_suggestion = 0;
    }

    /// Move the sidebar selection by `delta` rows (negative = towards newer chats).
    /// From the new chat screen, moving down selects the newest chat.
    pub(crate) fn select_adjacent(&mut self, delta: isize) {
        let count = self.chats.len();
        if count == 0 {
            return;
        }
        let row = match self.selected_row() {
            Some(row) => row.saturating_add_signed(delta).min(count - 1),
            None if delta > 0 => 0,
            None => return,
        };
        let picked = self.sidebar_chats().nth(row).map(|c| c.chat_id.clone());
        if let Some(id) = picked {
            self.select_chat(&id);
        }
    }

    /// Register a freshly created chat and make it active.
    pub(crate) fn add_chat(&mut self, chat: ChatRecord) {
        let id = chat.chat_id.clone();
        self.messages_by_chat.entry(id.clone()).or_default();
        self.chats.push(chat);
        self.select_chat(&id);
    }

    /// Append a message to its chat; follow the bottom when that chat is on screen.
    pub(crate) fn push_message(&mut self, message: MessageRecord) {
        if self.active_chat.as_deref() == Some(message.chat_id.as_str()) {
            self.scroll = ScrollPosition::Bottom;
        }
        self.messages_by_chat
            .entry(message.chat_id.clone())
            .or_default()
            .push(message);
    }

    /// Raw content of the newest bot message in the active chat.
    pub(crate) fn last_bot_reply(&self) -> Option<&str> {
        self.active_messages()
            .iter()
            .rev()
            .find(|m| m.sender == Sender::Bot)
            .map(|m| m.content.as_str())
    }
}
