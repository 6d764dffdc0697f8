//! Sidebar: new chat button and the chat list (newest first).

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use super::super::app::App;
use super::super::constants::{
    ACCENT, SIDEBAR_EMPTY_HINT, SIDEBAR_EMPTY_TITLE, SIDEBAR_NEW_CHAT,
};

pub(crate) fn draw_sidebar(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);
    let button_area = chunks[0];
    let list_area = chunks[2];

    let button_style = if app.active_chat.is_none() {
        Style::default().fg(Color::Black).bg(ACCENT)
    } else {
        Style::default().fg(ACCENT)
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {} ", SIDEBAR_NEW_CHAT),
            button_style.add_modifier(Modifier::BOLD),
        ))),
        button_area,
    );
    app.sidebar.new_chat_rect = Some(button_area);

    if app.chats.is_empty() {
        app.sidebar.list_rect = None;
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                SIDEBAR_EMPTY_TITLE,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                SIDEBAR_EMPTY_HINT,
                Style::default().fg(Color::DarkGray),
            )),
        ];
        f.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            list_area,
        );
        return;
    }

    let waiting = app.waiting_chat.as_deref();
    let items: Vec<ListItem> = app
        .sidebar_chats()
        .map(|chat| {
            let marker = if waiting == Some(chat.chat_id.as_str()) {
                "… "
            } else {
                "  "
            };
            ListItem::new(format!("{}{}", marker, chat.label()))
        })
        .collect();
    let selected = app.selected_row();
    app.sidebar.list_state.select(selected);
    let list = List::new(items)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(Color::Black).bg(ACCENT));
    f.render_stateful_widget(list, list_area, &mut app.sidebar.list_state);
    app.sidebar.list_rect = Some(list_area);
}
