//! Centralized keyboard shortcuts.
//!
//! Complete reference:
//!
//! | Action         | Keys                                  |
//! |----------------|---------------------------------------|
//! | Send           | Enter                                 |
//! | Newline        | Alt+Enter, Shift+Enter                |
//! | Scroll         | ↑ ↓ PageUp PageDown                   |
//! | New chat       | Ctrl+N                                |
//! | Previous chat  | Alt+↑, Esc+↑                          |
//! | Next chat      | Alt+↓, Esc+↓                          |
//! | Model selector | Alt+M, Esc+m, µ (Option+M Mac)        |
//! | Copy reply     | Alt+C, Esc+c, ç (Option+C Mac)        |
//! | Suggestions    | Tab / Shift+Tab (welcome screen)      |
//! | Cancel / close | Esc                                   |
//! | Quit           | Ctrl+C                                |
//!
//! On macOS, Option+key can send:
//! - Esc+key if terminal has "Use option as meta key" enabled
//! - A special character (µ, ç) if Option is in normal mode

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Detected shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Show the new chat screen (Ctrl+N)
    NewChat,
    /// Select the chat above in the sidebar (Alt+↑)
    PrevChat,
    /// Select the chat below in the sidebar (Alt+↓)
    NextChat,
    /// Model selector (Alt+M, Esc+m)
    ModelSelector,
    /// Copy the last bot reply (Alt+C, Esc+c)
    CopyReply,
    /// Quit (Ctrl+C)
    Quit,
}

/// Characters produced by Option+key on Mac (Option not configured as Meta).
const MAC_OPTION_M: char = '\u{00B5}'; // µ
const MAC_OPTION_C: char = '\u{00E7}'; // ç

impl Shortcut {
    /// Returns the shortcut if the key matches. Handles Esc+key sequence when terminal
    /// sends Option as Meta (e.g. macOS "Use option as meta key").
    pub fn match_key(key: &KeyEvent, escape_pending: bool) -> Option<Shortcut> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        if escape_pending {
            return match key.code {
                KeyCode::Char('m') => Some(Shortcut::ModelSelector),
                KeyCode::Char('c') => Some(Shortcut::CopyReply),
                KeyCode::Up => Some(Shortcut::PrevChat),
                KeyCode::Down => Some(Shortcut::NextChat),
                _ => None,
            };
        }

        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => Some(Shortcut::Quit),
            KeyCode::Char('n') if ctrl => Some(Shortcut::NewChat),
            KeyCode::Char('m') if alt => Some(Shortcut::ModelSelector),
            KeyCode::Char('c') if alt => Some(Shortcut::CopyReply),
            KeyCode::Up if alt => Some(Shortcut::PrevChat),
            KeyCode::Down if alt => Some(Shortcut::NextChat),
            KeyCode::Char(MAC_OPTION_M) => Some(Shortcut::ModelSelector),
            KeyCode::Char(MAC_OPTION_C) => Some(Shortcut::CopyReply),
            _ => None,
        }
    }

    /// True if key is Escape (start of Option+key sequence on some terminals).
    pub fn is_escape(key: &KeyEvent) -> bool {
        key.kind == KeyEventKind::Press && key.code == KeyCode::Esc
    }
}

#[cfg(test)]
mod tests {
    use super::Shortcut;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        }
    }

    #[test]
    fn is_escape() {
        assert!(Shortcut::is_escape(&key(
            KeyCode::Esc,
            KeyModifiers::empty()
        )));
        assert!(!Shortcut::is_escape(&key(
            KeyCode::Char('c'),
            KeyModifiers::empty()
        )));
    }

    #[test]
    fn match_quit_ctrl_c() {
        assert_eq!(
            Shortcut::match_key(&key(KeyCode::Char('c'), KeyModifiers::CONTROL), false),
            Some(Shortcut::Quit)
        );
    }

    #[test]
    fn match_copy_alt_c() {
        assert_eq!(
            Shortcut::match_key(&key(KeyCode::Char('c'), KeyModifiers::ALT), false),
            Some(Shortcut::CopyReply)
        );
    }

    #[test]
    fn match_model_selector_alt_m() {
        assert_eq!(
            Shortcut::match_key(&key(KeyCode::Char('m'), KeyModifiers::ALT), false),
            Some(Shortcut::ModelSelector)
        );
    }

    #[test]
    fn match_new_chat_ctrl_n() {
        assert_eq!(
            Shortcut::match_key(&key(KeyCode::Char('n'), KeyModifiers::CONTROL), false),
            Some(Shortcut::NewChat)
        );
    }

    #[test]
    fn match_chat_navigation_alt_arrows() {
        assert_eq!(
            Shortcut::match_key(&key(KeyCode::Up, KeyModifiers::ALT), false),
            Some(Shortcut::PrevChat)
        );
        assert_eq!(
            Shortcut::match_key(&key(KeyCode::Down, KeyModifiers::ALT), false),
            Some(Shortcut::NextChat)
        );
    }

    #[test]
    fn plain_arrows_are_not_shortcuts() {
        assert_eq!(
            Shortcut::match_key(&key(KeyCode::Up, KeyModifiers::empty()), false),
            None
        );
    }

    #[test]
    fn match_escape_pending_sequences() {
        assert_eq!(
            Shortcut::match_key(&key(KeyCode::Char('m'), KeyModifiers::empty()), true),
            Some(Shortcut::ModelSelector)
        );
        assert_eq!(
            Shortcut::match_key(&key(KeyCode::Char('c'), KeyModifiers::empty()), true),
            Some(Shortcut::CopyReply)
        );
        assert_eq!(
            Shortcut::match_key(&key(KeyCode::Down, KeyModifiers::empty()), true),
            Some(Shortcut::NextChat)
        );
    }

    #[test]
    fn match_mac_option_characters() {
        assert_eq!(
            Shortcut::match_key(&key(KeyCode::Char('µ'), KeyModifiers::empty()), false),
            Some(Shortcut::ModelSelector)
        );
        assert_eq!(
            Shortcut::match_key(&key(KeyCode::Char('ç'), KeyModifiers::empty()), false),
            Some(Shortcut::CopyReply)
        );
    }

    #[test]
    fn match_no_shortcut() {
        assert_eq!(
            Shortcut::match_key(&key(KeyCode::Char('x'), KeyModifiers::empty()), false),
            None
        );
    }

    #[test]
    fn match_key_release_ignored() {
        let key_release = KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Release,
            state: KeyEventState::empty(),
        };
        assert_eq!(Shortcut::match_key(&key_release, false), None);
    }
}

/// Labels for the bottom bar (2 lines for readability on narrow terminals).
pub mod labels {
    use ratatui::style::Color;
    use ratatui::text::{Line, Span, Text};

    const DIM: Color = Color::DarkGray;

    pub fn bottom_bar(is_waiting: bool) -> Text<'static> {
        if is_waiting {
            Text::from(Line::from(vec![
                Span::styled("Esc ", Color::Yellow),
                Span::raw("cancel"),
                Span::styled("  Alt+↑↓ ", DIM),
                Span::raw("chats"),
                Span::styled("  ↑↓ ", DIM),
                Span::raw("scroll"),
            ]))
        } else {
            Text::from(vec![
                Line::from(vec![
                    Span::styled("Enter ", DIM),
                    Span::raw("send"),
                    Span::styled("  Alt+Enter ", DIM),
                    Span::raw("newline"),
                    Span::styled("  Tab ", DIM),
                    Span::raw("suggestion"),
                    Span::styled("  ↑↓ ", DIM),
                    Span::raw("scroll"),
                ]),
                Line::from(vec![
                    Span::styled("Ctrl+N ", DIM),
                    Span::raw("new"),
                    Span::styled("  Alt+↑↓ ", DIM),
                    Span::raw("chats"),
                    Span::styled("  Alt+M ", DIM),
                    Span::raw("model"),
                    Span::styled("  Alt+C ", DIM),
                    Span::raw("copy"),
                    Span::styled("  Ctrl+C ", DIM),
                    Span::raw("quit"),
                ]),
            ])
        }
    }
}
