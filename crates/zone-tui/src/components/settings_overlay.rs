//! SettingsOverlay component — theme and title cloak toggles, plus file locations.

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
    widgets::pane_chrome::{centered_rect, overlay_block},
};

const ITEMS: usize = 2;

pub struct SettingsOverlay {
    pub visible: bool,
    cursor: usize,
}

impl SettingsOverlay {
    pub fn new() -> Self {
        Self {
            visible: false,
            cursor: 0,
        }
    }

    fn toggle_selected(&self) -> Action {
        match self.cursor {
            0 => Action::ToggleTheme,
            _ => Action::ToggleCloak,
        }
    }
}

impl Component for SettingsOverlay {
    fn id(&self) -> ComponentId {
        ComponentId::Settings
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !self.visible {
            return vec![];
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char(',') | KeyCode::Char('q') => {
                vec![Action::ToggleSettings]
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
                vec![]
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor = (self.cursor + 1).min(ITEMS - 1);
                vec![]
            }
            KeyCode::Enter | KeyCode::Char(' ') => vec![self.toggle_selected()],
            KeyCode::Char('d') => vec![Action::ToggleTheme],
            KeyCode::Char('c') => vec![Action::ToggleCloak],
            _ => vec![],
        }
    }

    fn handle_mouse(&mut self, _event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::ToggleSettings = action {
            self.visible = !self.visible;
            self.cursor = 0;
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        if !self.visible {
            return;
        }
        let p = &state.palette;
        let item = |idx: usize, label: &'static str, value: String| {
            let selected = idx == self.cursor;
            let marker = if selected { "›" } else { " " };
            let style = if selected {
                p.style_selected(true)
            } else {
                p.style_default()
            };
            Line::from(vec![
                Span::styled(format!(" {} ", marker), Style::default().fg(p.accent)),
                Span::styled(format!("{:<14}", label), style),
                Span::styled(value, Style::default().fg(p.filter_fg)),
            ])
        };

        let lines = vec![
            item(0, "theme", state.theme.label().to_string()),
            item(
                1,
                "cloak title",
                if state.cloak { "on" } else { "off" }.to_string(),
            ),
            Line::from(""),
            Line::from(vec![
                Span::styled("   config  ", p.style_muted()),
                Span::styled(state.config_path.display().to_string(), p.style_secondary()),
            ]),
            Line::from(vec![
                Span::styled("   log     ", p.style_muted()),
                Span::styled(state.log_path.display().to_string(), p.style_secondary()),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                " enter toggle · esc close",
                Style::default().fg(p.muted).add_modifier(Modifier::ITALIC),
            )),
        ];

        let popup = centered_rect(60, lines.len() as u16 + 2, area);
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines)
                .block(overlay_block("settings", p))
                .wrap(Wrap { trim: false }),
            popup,
        );
    }
}
