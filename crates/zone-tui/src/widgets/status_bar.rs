//! Status bar — bottom line with the input mode and keybindings.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::Palette;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Search,
    Code,
    Viewer,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Search => "SEARCH",
            Self::Code => "LOCKED",
            Self::Viewer => "VIEWER",
        }
    }

    fn keys(self) -> &'static str {
        match self {
            Self::Normal => {
                " ↑↓/jk select  Enter open  / search  t/T tag  s/S sort  r refresh  y copy  Tab/1-2 panes  , settings  d theme  ? help  q quit"
            }
            Self::Search => " type to search  Up/Down move  Enter keep  Esc clear+close  Tab next pane",
            Self::Code => " type this week's access code  Enter unlock  Ctrl-C quit",
            Self::Viewer => " Esc close  o open in browser  y copy url",
        }
    }
}

pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode, palette: &Palette) {
    let color = match mode {
        InputMode::Normal => palette.secondary,
        InputMode::Search => palette.filter_fg,
        InputMode::Code => palette.accent,
        InputMode::Viewer => palette.ok,
    };
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode.label()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(mode.keys(), Style::default().fg(palette.muted)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw a horizontal separator line.
pub fn draw_separator(frame: &mut Frame, area: Rect, palette: &Palette) {
    let line = Line::from(Span::styled(
        "─".repeat(area.width as usize),
        Style::default().fg(palette.separator),
    ));
    frame.render_widget(Paragraph::new(line), area);
}
