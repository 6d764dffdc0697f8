//! Header: spinner logo, title, model name, signed-in email.

use std::sync::OnceLock;
use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::super::app::App;
use super::super::constants::{ACCENT, ACCENT_SECONDARY, LOGO_IDLE, LOGO_THINKING, TITLE};

/// Start time for the spinner animation phase.
static SPINNER_START: OnceLock<Instant> = OnceLock::new();

/// Max width for model name in header; longer names are truncated with "…".
const MODEL_HEADER_WIDTH: u16 = 24;
/// Max width for the email in header.
const EMAIL_HEADER_WIDTH: u16 = 32;

/// Current spinner frame (80 ms per frame).
pub(crate) fn spinner_frame() -> &'static str {
    let start = SPINNER_START.get_or_init(Instant::now);
    let phase = start.elapsed().as_millis() as usize;
    LOGO_THINKING[(phase / 80) % LOGO_THINKING.len()]
}

/// Keep the last `max_len` characters, prefixed with "…" when cut.
fn truncate_start(s: &str, max_len: usize) -> String {
    let count = s.chars().count();
    if count <= max_len {
        return s.to_string();
    }
    let tail: String = s.chars().skip(count - max_len.saturating_sub(1)).collect();
    format!("…{}", tail)
}

pub(crate) fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(MODEL_HEADER_WIDTH),
            Constraint::Length(EMAIL_HEADER_WIDTH),
        ])
        .split(area);
    let logo_area = header_chunks[0];
    let model_area = header_chunks[2];
    let email_area = header_chunks[3];

    let logo_symbol = if app.is_waiting() {
        spinner_frame()
    } else {
        LOGO_IDLE
    };
    f.render_widget(
        Paragraph::new(Span::styled(
            format!(" {} ", logo_symbol),
            Style::default().fg(ACCENT),
        )),
        logo_area,
    );

    let title_len = TITLE.chars().count() as u16;
    let title_area = Rect {
        x: area.x + area.width.saturating_sub(title_len) / 2,
        y: area.y,
        width: title_len.min(area.width),
        height: area.height,
    };
    // "Chat" plain, "Burak" highlighted
    let (head, tail) = TITLE.split_at(TITLE.len().min(4));
    let title = Line::from(vec![
        Span::styled(head, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            tail,
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(title), title_area);

    let model_line = Line::from(Span::styled(
        truncate_start(&app.model_name, MODEL_HEADER_WIDTH as usize),
        Style::default().fg(ACCENT_SECONDARY),
    ));
    f.render_widget(
        Paragraph::new(model_line).alignment(Alignment::Right),
        model_area,
    );

    let email = app.email.as_deref().unwrap_or("yerel kullanıcı");
    let email_line = Line::from(Span::styled(
        format!(" {} ", truncate_start(email, EMAIL_HEADER_WIDTH as usize - 2)),
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(
        Paragraph::new(email_line).alignment(Alignment::Right),
        email_area,
    );
}
