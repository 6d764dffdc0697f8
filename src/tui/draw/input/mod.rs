//! Input box, welcome screen with suggestion chips, bottom bar.

mod bar;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::super::app::App;
use super::super::constants::{
    ACCENT, INPUT_LINES, INPUT_PLACEHOLDER, SUGGESTIONS, WELCOME_SUBTITLE, WELCOME_TITLE,
};

pub(crate) use bar::draw as draw_bottom_bar;

/// Width of the centered column on the welcome screen.
const WELCOME_WIDTH: u16 = 72;

pub(crate) fn draw_welcome_center(f: &mut Frame, app: &mut App, area: Rect) {
    let width = WELCOME_WIDTH.min(area.width);
    let column = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        width,
        ..area
    };
    let chips = SUGGESTIONS.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(chips),
            Constraint::Length(1),
            Constraint::Length(INPUT_LINES),
            Constraint::Min(0),
        ])
        .split(column);

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            WELCOME_TITLE,
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center),
        chunks[1],
    );
    f.render_widget(
        Paragraph::new(WELCOME_SUBTITLE)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[3],
    );
    f.render_widget(
        Paragraph::new(suggestion_lines(app)).alignment(Alignment::Center),
        chunks[5],
    );
    draw_input_block(f, app, chunks[7]);
}

/// One line per chip; the selected one is highlighted.
fn suggestion_lines(app: &App) -> Vec<Line<'static>> {
    SUGGESTIONS
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let style = if i == app.selected_suggestion {
                Style::default().fg(Color::Black).bg(ACCENT)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(Span::styled(format!(" {} ", s), style))
        })
        .collect()
}

/// Wrap the input into display lines and locate the cursor (row, column).
/// Newlines typed with Alt+Enter start a new display line.
fn layout_input(input: &str, cursor: usize, width: usize) -> (Vec<String>, (usize, usize)) {
    let width = width.max(1);
    let cursor = input.floor_char_boundary(cursor.min(input.len()));
    let before = &input[..cursor];
    let cursor_logical = before.matches('\n').count();
    let cursor_col = before
        .rsplit('\n')
        .next()
        .map(|s| s.chars().count())
        .unwrap_or(0);

    let mut lines = Vec::new();
    let mut cursor_pos = (0, 0);
    for (i, logical) in input.split('\n').enumerate() {
        let wrapped: Vec<String> = if logical.is_empty() {
            vec![String::new()]
        } else {
            textwrap::wrap(logical, width)
                .into_iter()
                .map(|s| s.into_owned())
                .collect()
        };
        if i == cursor_logical {
            // Walk the wrapped rows; whitespace dropped at breaks is approximated.
            let mut remaining = cursor_col;
            let mut row = 0;
            for (r, line) in wrapped.iter().enumerate() {
                row = r;
                let len = line.chars().count();
                if remaining <= len || r + 1 == wrapped.len() {
                    break;
                }
                remaining = remaining.saturating_sub(len + 1);
            }
            cursor_pos = (lines.len() + row, remaining.min(width));
        }
        lines.extend(wrapped);
    }
    (lines, cursor_pos)
}

pub(crate) fn draw_input_block(f: &mut Frame, app: &mut App, input_area: Rect) {
    let border_style = if app.model_selector.is_none() {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = input_block.inner(input_area);
    let inner_height = inner.height as usize;

    if app.input.is_empty() {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            INPUT_PLACEHOLDER,
            Style::default().fg(Color::DarkGray),
        )))
        .block(input_block);
        f.render_widget(placeholder, input_area);
        f.set_cursor_position(Position::new(inner.x, inner.y));
        return;
    }

    let (lines, (cursor_line, cursor_col)) =
        layout_input(&app.input, app.input_cursor, inner.width as usize);
    let total_lines = lines.len();
    let scroll_y = cursor_line
        .saturating_sub(inner_height.saturating_sub(1))
        .min(total_lines.saturating_sub(inner_height));
    let para = Paragraph::new(lines.into_iter().map(Line::from).collect::<Vec<_>>())
        .block(input_block)
        .style(Style::default().fg(Color::White))
        .scroll((scroll_y as u16, 0));
    f.render_widget(para, input_area);

    let cursor_row_in_view = cursor_line.saturating_sub(scroll_y);
    let cx = inner.x + cursor_col.min(inner.width.saturating_sub(1) as usize) as u16;
    let cy = inner.y + cursor_row_in_view as u16;
    f.set_cursor_position(Position::new(cx, cy));
}
