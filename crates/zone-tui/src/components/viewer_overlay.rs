//! ViewerOverlay component — details for the zone the frame host is showing.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

use zone_proto::render::ZoneCard;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::Palette,
    widgets::pane_chrome::{centered_rect, overlay_block},
};

pub struct ViewerOverlay;

impl ViewerOverlay {
    pub fn new() -> Self {
        Self
    }
}

fn row<'a>(label: &'a str, value: String, color: ratatui::style::Color, p: &Palette) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!(" {:<10}", label), p.style_muted()),
        Span::styled(value, Style::default().fg(color)),
    ])
}

impl Component for ViewerOverlay {
    fn id(&self) -> ComponentId {
        ComponentId::Viewer
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let Some(ref zone) = state.open_zone else {
            return vec![];
        };
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => vec![Action::CloseZone],
            KeyCode::Char('y') => vec![Action::CopyToClipboard(zone.url.clone())],
            KeyCode::Char('o') => vec![Action::LaunchBrowser],
            _ => vec![],
        }
    }

    fn handle_mouse(&mut self, _event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn on_action(&mut self, _action: &Action, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        let Some(ref zone) = state.open_zone else {
            return;
        };
        let p = &state.palette;
        let card = ZoneCard::from_zone(zone);

        let mut lines = vec![
            Line::from(Span::styled(
                format!(" {}", card.title),
                Style::default()
                    .fg(p.primary)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            row("author", zone.author_label().to_string(), p.author, p),
            row("link", zone.author_link().to_string(), p.secondary, p),
            row("id", zone.id.clone(), p.secondary, p),
        ];
        if let Some(plays) = card.plays {
            lines.push(row("plays", plays, p.plays, p));
        }
        if !zone.tags.is_empty() {
            lines.push(row("tags", zone.tags.join(" · "), p.tag, p));
        }
        lines.push(row("url", zone.url.clone(), p.secondary, p));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(" showing at ", p.style_muted()),
            Span::styled(
                state.viewer_url.clone(),
                Style::default().fg(p.ok).add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " esc close · o open browser · y copy url",
            p.style_muted(),
        )));

        let popup = centered_rect(70, lines.len() as u16 + 2, area);
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines)
                .block(overlay_block("viewer", p))
                .wrap(Wrap { trim: false }),
            popup,
        );
    }
}
