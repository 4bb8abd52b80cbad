//! AppState — shared read-only data passed to all components during render/event.
//!
//! Components read this, including the controller, but never mutate it.
//! The App event-loop is the only thing that writes to AppState.

use std::path::PathBuf;

use zone_proto::controller::Controller;
use zone_proto::protocol::Zone;

use crate::theme::{Palette, Theme};
use crate::widgets::status_bar::InputMode;

pub struct AppState {
    pub controller: Controller,

    // ── Appearance ──────────────────────────────────────────────────────────
    pub theme: Theme,
    pub palette: Palette,
    pub cloak: bool,

    // ── UI mode ─────────────────────────────────────────────────────────────
    pub input_mode: InputMode,
    /// Zone currently shown by the frame host.
    pub open_zone: Option<Zone>,
    /// Loopback page the frame host serves.
    pub viewer_url: String,

    // ── Paths ───────────────────────────────────────────────────────────────
    pub config_path: PathBuf,
    pub log_path: PathBuf,
}

impl AppState {
    pub fn new(controller: Controller, theme: Theme, cloak: bool) -> Self {
        Self {
            controller,
            theme,
            palette: theme.palette(),
            cloak,
            input_mode: InputMode::Normal,
            open_zone: None,
            viewer_url: String::new(),
            config_path: PathBuf::new(),
            log_path: PathBuf::new(),
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.palette = theme.palette();
    }
}
