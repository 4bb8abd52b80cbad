//! AccessPrompt component — modal code entry shown while the gate is locked.
//!
//! It cannot be dismissed; the only ways out are a correct code or quitting.

use ratatui::crossterm::event::{KeyEvent, KeyEventKind, MouseEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    widgets::{
        filter_input::{FilterAction, FilterInput},
        pane_chrome::{centered_rect, overlay_block},
    },
};

pub struct AccessPrompt {
    input: FilterInput,
    error: Option<String>,
}

impl AccessPrompt {
    pub fn new() -> Self {
        let mut input = FilterInput::new("code", "year-week");
        input.activate();
        Self { input, error: None }
    }
}

impl Component for AccessPrompt {
    fn id(&self) -> ComponentId {
        ComponentId::AccessPrompt
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match self.input.handle_key(key) {
            FilterAction::Confirmed(code) => vec![Action::SubmitCode(code)],
            FilterAction::Changed(_) => {
                self.error = None;
                vec![]
            }
            FilterAction::Cancelled => {
                // Escape never dismisses the prompt.
                self.input.activate();
                vec![]
            }
        }
    }

    fn handle_mouse(&mut self, _event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        match action {
            Action::CodeRejected => {
                self.error = Some("Incorrect code. Try again.".to_string());
                self.input.clear();
            }
            Action::SubmitCode(_) => self.error = None,
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        if !state.controller.is_locked() {
            return;
        }
        let p = &state.palette;
        let popup = centered_rect(50, 8, area);
        frame.render_widget(Clear, popup);
        let block = overlay_block("zonedeck is locked", p);
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " enter this week's access code",
                p.style_secondary(),
            ))),
            rows[0],
        );
        self.input.draw(frame, rows[2], p);
        if let Some(ref err) = self.error {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    format!(" {}", err),
                    Style::default().fg(p.error).add_modifier(Modifier::BOLD),
                ))),
                rows[3],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use chrono::NaiveDate;
    use ratatui::crossterm::event::{KeyCode, KeyModifiers};
    use zone_proto::access::{AccessGate, Clock};
    use zone_proto::controller::Controller;
    use zone_proto::store::MemoryStore;

    struct Fixed;

    impl Clock for Fixed {
        fn today(&self) -> NaiveDate {
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
        }
    }

    fn state() -> AppState {
        let gate = AccessGate::open(Box::new(Fixed), Box::new(MemoryStore::new()));
        AppState::new(Controller::new(gate), Theme::Dark, false)
    }

    fn press(prompt: &mut AccessPrompt, state: &AppState, code: KeyCode) -> Vec<Action> {
        prompt.handle_key(KeyEvent::new(code, KeyModifiers::NONE), state)
    }

    #[test]
    fn enter_submits_typed_code() {
        let s = state();
        let mut prompt = AccessPrompt::new();
        for c in "2026-43".chars() {
            press(&mut prompt, &s, KeyCode::Char(c));
        }
        let actions = press(&mut prompt, &s, KeyCode::Enter);
        assert!(matches!(actions.as_slice(), [Action::SubmitCode(c)] if c == "2026-43"));
    }

    #[test]
    fn rejection_clears_input_and_escape_cannot_dismiss() {
        let s = state();
        let mut prompt = AccessPrompt::new();
        press(&mut prompt, &s, KeyCode::Char('x'));
        prompt.on_action(&Action::CodeRejected, &s);
        assert!(prompt.error.is_some());
        let actions = press(&mut prompt, &s, KeyCode::Enter);
        assert!(matches!(actions.as_slice(), [Action::SubmitCode(c)] if c.is_empty()));

        assert!(press(&mut prompt, &s, KeyCode::Esc).is_empty());
        assert!(prompt.input.is_active());
    }
}
