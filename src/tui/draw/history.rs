//! Chat window: message bubbles, code blocks, loading spinner and scrollbar.

use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};

use crate::core::api::FALLBACK_REPLY;
use crate::core::normalize;
use crate::core::store::{MessageRecord, Sender};

use super::super::app::App;
use super::super::constants::{ACCENT_SECONDARY, BOT_LABEL, USER_LABEL};
use super::super::syntax::{highlight_code, slice_spans_by_range};
use super::super::text::{
    MessageSegment, parse_markdown_inline, parse_message_segments, wrap_message,
};
use super::header::spinner_frame;

/// Repeat a character to fill width (approximate; chars may have different display widths).
fn repeat_char(c: char, n: usize) -> String {
    std::iter::repeat_n(c, n).collect()
}

/// Parameters for rendering a message block.
struct MessageBlockParams<'a> {
    label: &'a str,
    /// Display text: raw for the user, normalized Markdown for the bot.
    content: &'a str,
    content_width: usize,
    wrap_width: usize,
    is_error: bool,
    is_user: bool,
    /// Local "HH:MM" shown next to the label.
    time: Option<String>,
}

fn add_code_block(
    lines: &mut Vec<Line<'static>>,
    border_style: Style,
    lang: &str,
    code: &str,
    inner_width: usize,
) {
    let code_style = Style::default().fg(ACCENT_SECONDARY);
    let lang_label = if lang.is_empty() { "code" } else { lang };
    let header = format!("┌─ {} ", lang_label);
    let trail = inner_width.saturating_sub(header.chars().count() + 1);
    lines.push(Line::from(vec![
        Span::styled("│ ", border_style),
        Span::styled(format!("{}{}┐", header, repeat_char('─', trail)), code_style),
    ]));

    let text_width = inner_width.saturating_sub(2).max(1);
    for spans in highlight_code(lang, code) {
        let len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let mut start = 0;
        loop {
            let end = (start + text_width).min(len);
            let mut line = vec![
                Span::styled("│ ", border_style),
                Span::styled("│ ", code_style),
            ];
            line.extend(slice_spans_by_range(&spans, start, end));
            lines.push(Line::from(line));
            start = end;
            if start >= len {
                break;
            }
        }
    }

    lines.push(Line::from(vec![
        Span::styled("│ ", border_style),
        Span::styled(
            format!("└{}┘", repeat_char('─', inner_width.saturating_sub(2))),
            code_style,
        ),
    ]));
}

/// Add a user or bot message block with borders, code blocks, and separator.
fn add_message_block(lines: &mut Vec<Line<'static>>, p: MessageBlockParams<'_>) {
    let border_color = if p.is_user {
        Color::DarkGray
    } else {
        ACCENT_SECONDARY
    };
    let border_style = Style::default().fg(border_color);

    // Top border: "┌─ Label ───...──┐" or "┌─ Label 14:32 ───...──┐"
    let top_label = match &p.time {
        Some(t) => format!("┌─ {} {} ", p.label, t),
        None => format!("┌─ {} ", p.label),
    };
    let top_trail_len = p.wrap_width.saturating_sub(top_label.chars().count() + 1);
    let top_line = format!("{}{}┐", top_label, repeat_char('─', top_trail_len));
    lines.push(Line::from(Span::styled(top_line, border_style)));

    for segment in parse_message_segments(p.content) {
        match segment {
            MessageSegment::Text(text) => {
                let trimmed = text.trim_matches('\n');
                if trimmed.trim().is_empty() {
                    continue;
                }
                for chunk in wrap_message(trimmed, p.content_width) {
                    let mut spans = vec![Span::styled("│ ", border_style), Span::raw("  ")];
                    if p.is_error {
                        spans.push(Span::styled(chunk, Style::default().fg(Color::Red)));
                    } else if p.is_user {
                        spans.push(Span::raw(chunk));
                    } else {
                        spans.extend(parse_markdown_inline(&chunk));
                    }
                    lines.push(Line::from(spans));
                }
            }
            MessageSegment::CodeBlock { lang, code } => {
                add_code_block(
                    lines,
                    border_style,
                    lang,
                    code,
                    p.content_width.saturating_sub(2),
                );
            }
        }
    }

    // Bottom border
    let bottom_line = format!("└{}┘", repeat_char('─', p.wrap_width.saturating_sub(2)));
    lines.push(Line::from(Span::styled(bottom_line, border_style)));
    lines.push(Line::from(""));
}

fn local_time(message: &MessageRecord) -> String {
    message
        .created_at
        .with_timezone(&Local)
        .format("%H:%M")
        .to_string()
}

pub(crate) fn draw_history(f: &mut Frame, app: &mut App, history_area: Rect) {
    let history_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(history_area);
    let text_area = history_chunks[0];
    let scrollbar_area = history_chunks[1];
    let wrap_width = text_area.width.saturating_sub(1) as usize;
    let content_width = wrap_width.saturating_sub(5);

    let mut lines: Vec<Line<'static>> = Vec::new();
    for message in app.active_messages() {
        let is_user = message.sender == Sender::User;
        let normalized;
        let content = if is_user {
            message.content.as_str()
        } else {
            normalized = normalize::normalize(&message.content);
            normalized.as_str()
        };
        add_message_block(
            &mut lines,
            MessageBlockParams {
                label: if is_user { USER_LABEL } else { BOT_LABEL },
                content,
                content_width,
                wrap_width,
                is_error: !is_user && message.content == FALLBACK_REPLY,
                is_user,
                time: app.show_timestamps.then(|| local_time(message)),
            },
        );
    }

    if app.is_waiting_on_active() {
        lines.push(Line::from(vec![Span::styled(
            format!("  {} Yanıt bekleniyor...", spinner_frame()),
            Style::default()
                .fg(ACCENT_SECONDARY)
                .add_modifier(Modifier::ITALIC),
        )]));
    }

    let total_lines = lines.len();
    let visible = text_area.height as usize;
    let max_scroll = total_lines.saturating_sub(visible.max(1));
    app.last_max_scroll = max_scroll;
    let scroll_pos = app.scroll_line().min(max_scroll);
    let visible_lines: Vec<Line> = lines.into_iter().skip(scroll_pos).take(visible).collect();

    f.render_widget(Paragraph::new(visible_lines), text_area);

    let mut scrollbar_state = ScrollbarState::default()
        .position(scroll_pos)
        .content_length(max_scroll);
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .thumb_symbol("█")
        .thumb_style(Style::default().fg(ACCENT_SECONDARY))
        .track_symbol(Some("│"));
    f.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
}
