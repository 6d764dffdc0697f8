//! Bottom bar: store backend and chat count on the left, shortcuts on the right.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::super::super::app::App;
use super::super::super::shortcuts::labels;

/// Draw the bottom bar with store info and keyboard shortcuts.
pub(crate) fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Min(60)])
        .split(area);

    let info = format!(" {} · {} chat", app.backend, app.chats.len());
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            info,
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Left),
        chunks[0],
    );

    f.render_widget(
        Paragraph::new(labels::bottom_bar(app.is_waiting())).alignment(Alignment::Right),
        chunks[1],
    );
}
