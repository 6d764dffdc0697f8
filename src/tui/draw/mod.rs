//! TUI rendering: layout and widgets for the dashboard.

mod header;
mod history;
mod input;
mod popups;
mod sidebar;

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::app::App;
use super::constants::{ACCENT, INPUT_LINES, SIDEBAR_WIDTH};

/// Below this width the sidebar is hidden.
const MIN_WIDTH_WITH_SIDEBAR: u16 = 70;
const HEADER_HEIGHT: u16 = 2;

pub(super) fn draw(f: &mut Frame, app: &mut App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(3),
            Constraint::Length(2),
        ])
        .split(area);
    header::draw_header(f, app, rows[0]);

    let sidebar_width = if area.width >= MIN_WIDTH_WITH_SIDEBAR {
        SIDEBAR_WIDTH
    } else {
        0
    };
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(sidebar_width), Constraint::Min(10)])
        .split(rows[1]);
    if sidebar_width > 0 {
        sidebar::draw_sidebar(f, app, cols[0]);
    } else {
        app.sidebar.list_rect = None;
        app.sidebar.new_chat_rect = None;
    }

    let main = cols[1];
    if app.is_welcome() {
        input::draw_welcome_center(f, app, main);
    } else {
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(INPUT_LINES)])
            .split(main);
        history::draw_history(f, app, parts[0]);
        input::draw_input_block(f, app, parts[1]);
    }
    input::draw_bottom_bar(f, app, rows[2]);

    if let Some(ref mut selector) = app.model_selector {
        popups::draw_model_selector_popup(f, area, selector);
    }

    draw_toast(f, app, area);
}

/// Toast: top right, below header. Opaque background so it's visible over history.
fn draw_toast(f: &mut Frame, app: &mut App, area: Rect) {
    let Some(toast) = app.toast.as_ref() else {
        return;
    };
    if toast.until <= Instant::now() {
        app.toast = None;
        return;
    }
    let color = if toast.is_error { Color::Red } else { ACCENT };
    let text = format!(" {} ", toast.text);
    let toast_width = (text.chars().count() as u16 + 2).min(area.width);
    let toast_area = Rect {
        x: area.x + area.width.saturating_sub(toast_width).saturating_sub(1),
        y: area.y + HEADER_HEIGHT,
        width: toast_width,
        height: 3u16.min(area.height.saturating_sub(HEADER_HEIGHT)),
    };
    f.render_widget(Clear, toast_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(Color::Black));
    let para = Paragraph::new(Line::from(text))
        .block(block)
        .style(Style::default().fg(color).bg(Color::Black));
    f.render_widget(para, toast_area);
}
