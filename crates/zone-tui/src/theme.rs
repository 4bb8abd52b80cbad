//! Color palettes and style helpers for the zonedeck TUI.

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Unknown values fall back to dark.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "light" => Self::Light,
            _ => Self::Dark,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::Dark => Palette::dark(),
            Self::Light => Palette::light(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub bg: Color,
    pub overlay_bg: Color,
    pub accent: Color,
    pub primary: Color,
    pub secondary: Color,
    pub muted: Color,
    pub separator: Color,
    pub selection_bg: Color,
    pub border: Color,
    pub border_focused: Color,
    pub number_hint: Color,
    pub filter_bg: Color,
    pub filter_fg: Color,
    pub tag: Color,
    pub plays: Color,
    pub author: Color,
    pub ok: Color,
    pub warn: Color,
    pub error: Color,
    pub info: Color,
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb(18, 18, 18),
            overlay_bg: Color::Rgb(18, 18, 26),
            accent: Color::Rgb(255, 95, 95),
            primary: Color::Rgb(210, 210, 225),
            secondary: Color::Rgb(115, 115, 138),
            muted: Color::Rgb(72, 72, 88),
            separator: Color::Rgb(40, 40, 52),
            selection_bg: Color::Rgb(28, 28, 40),
            border: Color::Rgb(40, 40, 52),
            border_focused: Color::Rgb(120, 100, 200),
            number_hint: Color::Rgb(90, 90, 115),
            filter_bg: Color::Rgb(20, 20, 32),
            filter_fg: Color::Rgb(255, 200, 80),
            tag: Color::Rgb(80, 140, 200),
            plays: Color::Rgb(100, 160, 130),
            author: Color::Rgb(180, 120, 220),
            ok: Color::Rgb(80, 200, 120),
            warn: Color::Rgb(255, 184, 80),
            error: Color::Rgb(255, 80, 80),
            info: Color::Rgb(80, 160, 220),
        }
    }

    pub fn light() -> Self {
        Self {
            bg: Color::Rgb(246, 245, 240),
            overlay_bg: Color::Rgb(236, 235, 228),
            accent: Color::Rgb(200, 40, 60),
            primary: Color::Rgb(30, 30, 40),
            secondary: Color::Rgb(90, 90, 110),
            muted: Color::Rgb(150, 150, 165),
            separator: Color::Rgb(210, 210, 218),
            selection_bg: Color::Rgb(222, 220, 240),
            border: Color::Rgb(200, 200, 210),
            border_focused: Color::Rgb(110, 80, 200),
            number_hint: Color::Rgb(140, 140, 160),
            filter_bg: Color::Rgb(236, 232, 214),
            filter_fg: Color::Rgb(150, 90, 0),
            tag: Color::Rgb(30, 100, 170),
            plays: Color::Rgb(40, 120, 80),
            author: Color::Rgb(120, 60, 170),
            ok: Color::Rgb(30, 140, 70),
            warn: Color::Rgb(190, 120, 0),
            error: Color::Rgb(200, 40, 40),
            info: Color::Rgb(30, 110, 180),
        }
    }

    pub fn style_default(&self) -> Style {
        Style::default().fg(self.primary)
    }

    pub fn style_secondary(&self) -> Style {
        Style::default().fg(self.secondary)
    }

    pub fn style_muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn style_selected(&self, focused: bool) -> Style {
        let s = Style::default().bg(self.selection_bg).fg(self.primary);
        if focused {
            s.add_modifier(Modifier::BOLD)
        } else {
            s
        }
    }

    pub fn style_border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border)
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::dark()
    }
}
