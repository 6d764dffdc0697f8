//! TUI constants: colors, timing, and the Turkish UI texts.

use ratatui::style::Color;

/// Accent green color (#98FB98).
pub(super) const ACCENT: Color = Color::Rgb(152, 251, 152);

/// Secondary accent, soft cyan (#7EC8E3). Bot bubbles and code blocks.
pub(super) const ACCENT_SECONDARY: Color = Color::Rgb(126, 200, 227);

/// Header title.
pub(super) const TITLE: &str = "ChatBurak";

/// Suggestion chips on the welcome screen (Tab to cycle, Enter to use).
pub(super) const SUGGESTIONS: &[&str] = &[
    "Merhaba, nasıl yardımcı olabilirsin?",
    "Bana bir hikaye anlatır mısın?",
    "Bugün hava nasıl?",
];

pub(super) const WELCOME_TITLE: &str = "Sohbete Başlayın";
pub(super) const WELCOME_SUBTITLE: &str = "Yapay zeka ile sohbet etmek için aşağıdaki metin kutusuna mesajınızı yazın. Herhangi bir konuda soru sorabilir veya yardım isteyebilirsiniz.";

pub(super) const INPUT_PLACEHOLDER: &str =
    "Mesajınızı yazın... (Enter tuşuna basarak gönderebilirsiniz)";

pub(super) const SIDEBAR_NEW_CHAT: &str = "+ Yeni Chat Oluştur";
pub(super) const SIDEBAR_EMPTY_TITLE: &str = "Henüz Chat Yok";
pub(super) const SIDEBAR_EMPTY_HINT: &str =
    "Yeni bir sohbet başlatmak için \"Yeni Chat Oluştur\" (Ctrl+N) kullanın";

/// Labels of the message bubbles.
pub(super) const USER_LABEL: &str = "Sen";
pub(super) const BOT_LABEL: &str = "Bot";

/// Sidebar width in columns.
pub(crate) const SIDEBAR_WIDTH: u16 = 30;

/// Event poll timeout in milliseconds (main loop).
pub(crate) const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// How long Esc waits for the second half of an Option+key sequence.
pub(crate) const ESC_SEQUENCE_DRAIN_MS: u64 = 150;

/// How long the copy and status toasts stay on screen.
pub(crate) const TOAST_SECS: u64 = 3;

/// Scroll amount for arrow keys and mouse wheel.
pub(crate) const SCROLL_LINES_SMALL: usize = 3;

/// Scroll amount for PageUp/PageDown.
pub(crate) const SCROLL_LINES_PAGE: usize = 10;

/// Input textarea height (number of visible lines; -2 for block borders = inner lines).
pub(crate) const INPUT_LINES: u16 = 5;

/// Minimalist logo when idle (single character).
pub(super) const LOGO_IDLE: &str = "◆";

/// Spinner frames for the loading animation (braille pattern, 4 frames).
pub(super) const LOGO_THINKING: &[&str] = &["⠋", "⠙", "⠹", "⠸"];
