//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  Drawing also measures which cards
//! ended up on screen and hands that range to the app, which is how the
//! loader learns about visibility.
//!
//! ## For contributors
//!
//! * The layout is a two-row split: a scrollable card list on top and a
//!   one-line status bar at the bottom.
//! * Every card is exactly [`CARD_HEIGHT`] rows; the visible range math
//!   depends on it.

use std::ops::Range;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use content_cards::Record;

use crate::app::App;

/// Rows per card: date, title, description, image URL, spacer.
pub const CARD_HEIGHT: u16 = 5;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, items: &[Record], frame: &mut Frame) {
    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    draw_card_list(app, items, frame, main_area);
    draw_status_bar(app, frame, status_area);
}

fn card(record: &Record) -> ListItem<'_> {
    ListItem::new(Text::from(vec![
        Line::from(Span::styled(
            format!("PUBLISHED AT {}", record.display_date()),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            record.title(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(record.description().lines().next().unwrap_or_default()),
        Line::from(Span::styled(
            record.image_url(),
            Style::default().fg(Color::Cyan),
        )),
        Line::default(),
    ]))
}

/// Cards `offset..` that fit in `area` (partially visible ones included).
fn visible_range(offset: usize, area: Rect, len: usize) -> Range<usize> {
    let inner = area.height.saturating_sub(2);
    let count = usize::from(inner.div_ceil(CARD_HEIGHT));
    offset.min(len)..(offset + count).min(len)
}

/// Render the scrollable card list.
fn draw_card_list(app: &mut App, items: &[Record], frame: &mut Frame, area: Rect) {
    let list = List::new(items.iter().map(card))
        .block(
            Block::default()
                .title(" Content ")
                .borders(Borders::ALL),
        )
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);

    let viewport = visible_range(app.list_state.offset(), area, items.len());
    app.set_viewport(viewport);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!("{} cards", app.item_count()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  q: quit  ↑/↓: scroll  Home/End: jump  r: retry"),
    ]));
    frame.render_widget(status, area);
}
