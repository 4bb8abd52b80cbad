//! HelpOverlay component — centered popup with keyboard shortcut reference.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::Palette,
    widgets::pane_chrome::{centered_rect, overlay_block},
};

pub struct HelpOverlay {
    pub visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }
}

impl Component for HelpOverlay {
    fn id(&self) -> ComponentId {
        ComponentId::Help
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !self.visible {
            return vec![];
        }
        match key.code {
            KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc => vec![Action::ToggleHelp],
            // Consume all keys while the overlay is open
            _ => vec![],
        }
    }

    fn handle_mouse(&mut self, _event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::ToggleHelp = action {
            self.visible = !self.visible;
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        if !self.visible {
            return;
        }
        let p = &state.palette;
        let section = |title: &'static str| {
            Line::from(Span::styled(
                title,
                Style::default().fg(p.muted).add_modifier(Modifier::BOLD),
            ))
        };

        let help_lines: Vec<Line> = vec![
            section(" browse"),
            help_row("↑ / ↓  or  j / k", "move selection", p),
            help_row("pg up / pg dn", "jump 10 rows", p),
            help_row("home / end  or  g / G", "first / last", p),
            help_row("tab / shift-tab", "featured ↔ zones", p),
            help_row("1 / 2", "focus featured / zones", p),
            help_row("enter  or  double-click", "open zone in the viewer", p),
            help_row("y", "copy zone url", p),
            Line::from(""),
            section(" narrow down"),
            help_row("/", "search name, author, id (Esc clears + closes)", p),
            help_row("t / T", "next / previous tag", p),
            help_row("s / S", "next / previous sort", p),
            help_row("r", "reload the catalog", p),
            Line::from(""),
            section(" ui"),
            help_row(",", "settings", p),
            help_row("d", "dark / light theme", p),
            help_row("?", "toggle this help", p),
            help_row("q / Ctrl+C", "quit", p),
            Line::from(""),
            Line::from(Span::styled(" press ? or esc to close", p.style_muted())),
        ];

        let popup = centered_rect(68, help_lines.len() as u16 + 2, area);
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(help_lines)
                .block(overlay_block("keyboard shortcuts", p))
                .wrap(Wrap { trim: false }),
            popup,
        );
    }
}

fn help_row<'a>(key: &'a str, desc: &'a str, p: &Palette) -> Line<'a> {
    Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!("{:<24}", key),
            Style::default().fg(p.primary).add_modifier(Modifier::BOLD),
        ),
        Span::styled(desc, Style::default().fg(p.secondary)),
    ])
}
