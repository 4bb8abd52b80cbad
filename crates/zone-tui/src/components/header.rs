//! Header — 2-row top bar. Not focusable.
//!
//! Row 1: title, lock state, status label.
//! Row 2: active tag, sort, search text, theme.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use zone_proto::controller::Status;

use crate::app_state::AppState;

pub fn draw(frame: &mut Frame, area: Rect, state: &AppState) {
    let p = &state.palette;
    let c = &state.controller;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let (lock_glyph, lock_color) = if c.is_locked() {
        ("● locked", p.accent)
    } else {
        ("○ unlocked", p.ok)
    };
    let status = c.status();
    let status_color = match status {
        Status::Error(_) => p.error,
        Status::Loading => p.warn,
        Status::Locked => p.accent,
        Status::Showing(_) => p.secondary,
    };
    let row1 = Line::from(vec![
        Span::styled(
            " zonedeck ",
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(lock_glyph, Style::default().fg(lock_color)),
        Span::styled("  ", Style::default()),
        Span::styled(status.label(), Style::default().fg(status_color)),
    ]);
    frame.render_widget(Paragraph::new(row1), rows[0]);

    if rows[1].height == 0 {
        return;
    }
    let q = c.query();
    let mut spans = vec![
        Span::styled(" tag ", p.style_muted()),
        Span::styled(q.tag.label().to_string(), Style::default().fg(p.tag)),
        Span::styled(format!(" ({})", c.tags().len()), p.style_muted()),
        Span::styled("  sort ", p.style_muted()),
        Span::styled(q.sort.label(), Style::default().fg(p.filter_fg)),
    ];
    if !q.search.is_empty() {
        spans.push(Span::styled("  search ", p.style_muted()));
        spans.push(Span::styled(q.search.clone(), p.style_default()));
    }
    spans.push(Span::styled("  theme ", p.style_muted()));
    spans.push(Span::styled(state.theme.label(), p.style_secondary()));
    frame.render_widget(Paragraph::new(Line::from(spans)), rows[1]);
}
