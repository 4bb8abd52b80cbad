//! FilterInput — wraps tui-input for the search bar and the access-code prompt.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::theme::Palette;

#[derive(Debug, PartialEq)]
pub enum FilterAction {
    Changed(String),
    Confirmed(String),
    Cancelled,
}

pub struct FilterInput {
    input: Input,
    active: bool,
    prefix: &'static str,
    placeholder: String,
}

impl FilterInput {
    pub fn new(prefix: &'static str, placeholder: impl Into<String>) -> Self {
        Self {
            input: Input::default(),
            active: false,
            prefix,
            placeholder: placeholder.into(),
        }
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn clear(&mut self) {
        self.input = Input::default();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Handle a key event. Returns what happened.
    ///
    /// Esc with text clears it and emits `Changed("")`; Esc on an empty input
    /// deactivates and emits `Cancelled`.
    pub fn handle_key(&mut self, key: KeyEvent) -> FilterAction {
        match key.code {
            KeyCode::Esc => {
                if !self.input.value().is_empty() {
                    self.input = Input::default();
                    FilterAction::Changed(String::new())
                } else {
                    self.deactivate();
                    FilterAction::Cancelled
                }
            }
            KeyCode::Enter => FilterAction::Confirmed(self.input.value().to_string()),
            _ => {
                self.input.handle_event(&Event::Key(key));
                FilterAction::Changed(self.input.value().to_string())
            }
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let lead = self.prefix.chars().count() + 1;
        let scroll = self
            .input
            .visual_scroll((area.width as usize).saturating_sub(lead + 2));
        let value = self.input.value();
        let display = if value.is_empty() {
            Span::styled(
                format!("{} {}", self.prefix, self.placeholder),
                Style::default().fg(palette.muted),
            )
        } else {
            let visible: String = value.chars().skip(scroll).collect();
            Span::styled(
                format!("{} {}", self.prefix, visible),
                Style::default().fg(palette.filter_fg),
            )
        };

        let paragraph =
            Paragraph::new(Line::from(vec![display])).style(Style::default().bg(palette.filter_bg));
        frame.render_widget(paragraph, area);

        if self.active && area.width > 0 {
            let offset = lead + self.input.visual_cursor().saturating_sub(scroll);
            let cursor_x = area.x + offset as u16;
            frame.set_cursor_position((cursor_x.min(area.x + area.width - 1), area.y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_then_escape_twice_clears_then_cancels() {
        let mut f = FilterInput::new("/", "search");
        f.activate();
        assert_eq!(
            f.handle_key(key(KeyCode::Char('a'))),
            FilterAction::Changed("a".into())
        );
        assert_eq!(f.handle_key(key(KeyCode::Esc)), FilterAction::Changed(String::new()));
        assert!(f.is_active());
        assert_eq!(f.handle_key(key(KeyCode::Esc)), FilterAction::Cancelled);
        assert!(!f.is_active());
    }

    #[test]
    fn enter_confirms_current_text() {
        let mut f = FilterInput::new("code", "");
        f.activate();
        for c in "2026-42".chars() {
            f.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(
            f.handle_key(key(KeyCode::Enter)),
            FilterAction::Confirmed("2026-42".into())
        );
        assert!(f.is_active());
    }
}
