//! App — component-based event loop.
//!
//! - `App` owns all components and `AppState` (which owns the controller).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background tasks.
//! - The event loop draws a frame, then awaits the next message or tick.
//! - Components return `Vec<Action>`; App dispatches each Action.
//! - Catalog loads run in spawned tasks and come back tagged with their ticket.

use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Block,
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use zone_proto::catalog::{load_catalog, CatalogError, CatalogSource};
use zone_proto::controller::RefreshTicket;
use zone_proto::platform;
use zone_proto::protocol::Zone;
use zone_proto::store::KeyValueStore;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::{
        access_prompt::AccessPrompt, header, help_overlay::HelpOverlay,
        settings_overlay::SettingsOverlay, viewer_overlay::ViewerOverlay, zone_list::ZoneList,
    },
    focus::FocusRing,
    theme::Theme,
    viewer::FrameHost,
    widgets::{
        filter_input::{FilterAction, FilterInput},
        status_bar::{self, InputMode},
        toast::{Severity, ToastManager},
    },
};

pub const THEME_KEY: &str = "theme";
pub const CLOAK_KEY: &str = "cloak";

const TITLE: &str = "zonedeck";
/// Terminal title shown while cloaked.
const DECOY_TITLE: &str = "bash";

const FEATURED_PANE_HEIGHT: u16 = 7;

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    CatalogLoaded(RefreshTicket, Result<Vec<Zone>, CatalogError>),
}

/// Last-drawn layout rects, used by `handle_mouse` for hit-testing.
#[derive(Default, Clone)]
struct PaneAreas {
    featured: Rect,
    zones: Rect,
}

fn hit(r: Rect, col: u16, row: u16) -> bool {
    r.width > 0
        && r.height > 0
        && col >= r.x
        && col < r.x + r.width
        && row >= r.y
        && row < r.y + r.height
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App<S: CatalogSource + 'static> {
    pub state: AppState,

    // ── Collaborators ─────────────────────────────────────────────────────────
    source: Arc<S>,
    frame_host: FrameHost,
    prefs: Box<dyn KeyValueStore>,
    launch_browser: bool,

    // ── Components ────────────────────────────────────────────────────────────
    search: FilterInput,
    featured: ZoneList,
    zones: ZoneList,
    access_prompt: AccessPrompt,
    viewer: ViewerOverlay,
    settings: SettingsOverlay,
    help: HelpOverlay,

    focus: FocusRing,
    toast: ToastManager,
    pane_areas: PaneAreas,

    /// Actions raised while applying another action; drained by `dispatch`.
    follow_ups: Vec<Action>,
    msg_tx: Option<mpsc::Sender<AppMessage>>,
    should_quit: bool,
}

impl<S: CatalogSource + 'static> App<S> {
    pub fn new(
        mut state: AppState,
        source: Arc<S>,
        frame_host: FrameHost,
        prefs: Box<dyn KeyValueStore>,
        launch_browser: bool,
    ) -> Self {
        state.viewer_url = frame_host.page_url();
        if state.controller.is_locked() {
            state.input_mode = InputMode::Code;
        }
        Self {
            state,
            source,
            frame_host,
            prefs,
            launch_browser,
            search: FilterInput::new("/", "search zones by name, author or id…"),
            featured: ZoneList::featured(),
            zones: ZoneList::zones(),
            access_prompt: AccessPrompt::new(),
            viewer: ViewerOverlay::new(),
            settings: SettingsOverlay::new(),
            help: HelpOverlay::new(),
            focus: FocusRing::new(vec![ComponentId::Featured, ComponentId::Zones]),
            toast: ToastManager::new(),
            pane_areas: PaneAreas::default(),
            follow_ups: Vec::new(),
            msg_tx: None,
            should_quit: false,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());
        self.apply_title();

        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);
        self.msg_tx = Some(tx.clone());

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // A session that is already unlocked loads right away.
        self.start_refresh();

        // Toast expiry + spinner animation + component maintenance.
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        loop {
            terminal.draw(|f| self.draw(f))?;
            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    self.handle_message(msg).await;
                    while let Ok(next) = rx.try_recv() {
                        self.handle_message(next).await;
                    }
                }
                _ = ui_tick.tick() => {
                    self.toast.tick();
                    let tick_actions: Vec<Action> = {
                        let s = &self.state;
                        let mut all = Vec::new();
                        all.extend(self.featured.tick(s));
                        all.extend(self.zones.tick(s));
                        all.extend(self.access_prompt.tick(s));
                        all.extend(self.viewer.tick(s));
                        all.extend(self.settings.tick(s));
                        all.extend(self.help.tick(s));
                        all
                    };
                    for action in tick_actions {
                        self.dispatch(action).await;
                    }
                }
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        self.frame_host.close().await;
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        info!("zonedeck exiting");

        Ok(())
    }

    // ── Message handler ───────────────────────────────────────────────────────

    async fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Event(Event::Key(key)) => {
                if key.kind == KeyEventKind::Release {
                    return;
                }
                for action in self.handle_key(key) {
                    self.dispatch(action).await;
                }
            }
            AppMessage::Event(Event::Mouse(ev)) => {
                for action in self.handle_mouse(ev) {
                    self.dispatch(action).await;
                }
            }
            AppMessage::Event(_) => {}
            AppMessage::CatalogLoaded(ticket, result) => {
                let failure = result.as_ref().err().map(|e| e.to_string());
                if !self.state.controller.apply_refresh(ticket, result) {
                    return;
                }
                match failure {
                    Some(reason) => self
                        .toast
                        .resolve_spinner(Severity::Error, format!("Error loading zones: {}", reason)),
                    None => {
                        let label = self.state.controller.status().label();
                        self.toast.resolve_spinner(Severity::Success, label);
                    }
                }
                self.dispatch(Action::CatalogChanged).await;
            }
        }
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
            return vec![Action::Quit];
        }

        // Modal layers, top-most first.
        let s = &self.state;
        if s.controller.is_locked() {
            return self.access_prompt.handle_key(key, s);
        }
        if s.open_zone.is_some() {
            return self.viewer.handle_key(key, s);
        }
        if self.help.visible {
            return self.help.handle_key(key, s);
        }
        if self.settings.visible {
            return self.settings.handle_key(key, s);
        }

        if s.input_mode == InputMode::Search {
            match key.code {
                KeyCode::Tab => return vec![Action::CloseSearch, Action::FocusNext],
                KeyCode::BackTab => return vec![Action::CloseSearch, Action::FocusPrev],
                KeyCode::Up | KeyCode::Down => return self.key_to_focused(key),
                _ => {}
            }
            return match self.search.handle_key(key) {
                FilterAction::Changed(q) => vec![Action::SearchChanged(q)],
                FilterAction::Confirmed(_) | FilterAction::Cancelled => vec![Action::CloseSearch],
            };
        }

        match key.code {
            KeyCode::Char('q') if key.modifiers == KeyModifiers::NONE => vec![Action::Quit],
            KeyCode::Char('?') => vec![Action::ToggleHelp],
            KeyCode::Char(',') => vec![Action::ToggleSettings],
            KeyCode::Char('d') => vec![Action::ToggleTheme],
            KeyCode::Char('/') => vec![Action::OpenSearch],
            KeyCode::Char('t') => vec![Action::CycleTag(true)],
            KeyCode::Char('T') => vec![Action::CycleTag(false)],
            KeyCode::Char('s') => vec![Action::CycleSort(true)],
            KeyCode::Char('S') => vec![Action::CycleSort(false)],
            KeyCode::Char('r') => vec![Action::Refresh],
            KeyCode::Tab => vec![Action::FocusNext],
            KeyCode::BackTab => vec![Action::FocusPrev],
            KeyCode::Char('1') => vec![Action::FocusPane(ComponentId::Featured)],
            KeyCode::Char('2') => vec![Action::FocusPane(ComponentId::Zones)],
            _ => self.key_to_focused(key),
        }
    }

    fn key_to_focused(&mut self, key: KeyEvent) -> Vec<Action> {
        let s = &self.state;
        match self.focus.current() {
            Some(ComponentId::Featured) => self.featured.handle_key(key, s),
            Some(ComponentId::Zones) => self.zones.handle_key(key, s),
            _ => vec![],
        }
    }

    // ── Mouse handling ────────────────────────────────────────────────────────

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        let relevant = matches!(
            event.kind,
            MouseEventKind::Down(_) | MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
        );
        let modal = self.state.controller.is_locked()
            || self.state.open_zone.is_some()
            || self.help.visible
            || self.settings.visible;
        if !relevant || modal {
            return vec![];
        }

        let areas = self.pane_areas.clone();
        let s = &self.state;
        let (id, mut actions) = if hit(areas.featured, event.column, event.row) {
            (
                ComponentId::Featured,
                self.featured.handle_mouse(event, areas.featured, s),
            )
        } else if hit(areas.zones, event.column, event.row) {
            (
                ComponentId::Zones,
                self.zones.handle_mouse(event, areas.zones, s),
            )
        } else {
            return vec![];
        };
        if !self.focus.is_focused(id) {
            actions.insert(0, Action::FocusPane(id));
        }
        actions
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    async fn dispatch(&mut self, action: Action) {
        let mut queue = VecDeque::from([action]);
        while let Some(action) = queue.pop_front() {
            // Components see every action first, focused or not.
            let secondary: Vec<Action> = {
                let s = &self.state;
                let mut out = Vec::new();
                out.extend(self.featured.on_action(&action, s));
                out.extend(self.zones.on_action(&action, s));
                out.extend(self.access_prompt.on_action(&action, s));
                out.extend(self.viewer.on_action(&action, s));
                out.extend(self.settings.on_action(&action, s));
                out.extend(self.help.on_action(&action, s));
                out
            };
            self.apply_action(action).await;
            queue.extend(secondary);
            queue.extend(self.follow_ups.drain(..));
        }
    }

    async fn apply_action(&mut self, action: Action) {
        match &action {
            Action::CatalogChanged | Action::SearchChanged(_) => {}
            // Never log the typed code.
            Action::SubmitCode(_) => debug!("apply_action: SubmitCode"),
            _ => debug!("apply_action: {:?}", action),
        }
        match action {
            // ── Navigation ────────────────────────────────────────────────────
            Action::FocusNext => {
                self.focus.next();
            }
            Action::FocusPrev => {
                self.focus.prev();
            }
            Action::FocusPane(id) => self.focus.set(id),

            // ── Query ─────────────────────────────────────────────────────────
            Action::OpenSearch => {
                self.search.activate();
                self.state.input_mode = InputMode::Search;
            }
            Action::CloseSearch => {
                self.search.deactivate();
                self.state.input_mode = InputMode::Normal;
            }
            Action::SearchChanged(q) => {
                self.state.controller.set_search(&q);
                self.follow_ups.push(Action::CatalogChanged);
            }
            Action::CycleTag(forward) => {
                self.state.controller.cycle_tag(forward);
                let label = self.state.controller.query().tag.label().to_string();
                self.toast.info(format!("tag: {}", label));
                self.follow_ups.push(Action::CatalogChanged);
            }
            Action::CycleSort(forward) => {
                let current = self.state.controller.query().sort;
                let next = if forward { current.next() } else { current.prev() };
                self.state.controller.set_sort(next);
                self.toast.info(format!("sort: {}", next.label()));
                self.follow_ups.push(Action::CatalogChanged);
            }

            // ── Catalog ───────────────────────────────────────────────────────
            Action::Refresh => self.start_refresh(),

            // ── Access ────────────────────────────────────────────────────────
            Action::SubmitCode(code) => match self.state.controller.submit_code(&code) {
                Ok(ticket) => {
                    info!("unlocked");
                    self.state.input_mode = InputMode::Normal;
                    self.toast.success("unlocked");
                    if let Some(ticket) = ticket {
                        self.spawn_load(ticket);
                    }
                }
                Err(e) => {
                    warn!("access code rejected: {}", e);
                    self.follow_ups.push(Action::CodeRejected);
                }
            },

            // ── Viewer ────────────────────────────────────────────────────────
            Action::OpenZone(idx) => {
                let Some(zone) = self.state.controller.zone(idx).cloned() else {
                    return;
                };
                let needs_browser = self.frame_host.open(&zone).await;
                self.state.open_zone = Some(zone);
                self.state.input_mode = InputMode::Viewer;
                if needs_browser {
                    if self.launch_browser {
                        self.follow_ups.push(Action::LaunchBrowser);
                    } else {
                        self.toast
                            .info(format!("open {} in a browser", self.state.viewer_url));
                    }
                }
            }
            Action::CloseZone => {
                self.frame_host.close().await;
                self.state.open_zone = None;
                self.state.input_mode = InputMode::Normal;
            }
            Action::LaunchBrowser => {
                if let Err(e) = platform::open_in_browser(&self.state.viewer_url) {
                    warn!("browser launch failed: {}", e);
                    self.toast.error(format!("could not open a browser: {}", e));
                }
            }

            // ── UI toggles ────────────────────────────────────────────────────
            Action::ToggleTheme => {
                let theme = self.state.theme.toggle();
                self.state.set_theme(theme);
                self.persist_pref(THEME_KEY, Some(theme.label()));
            }
            Action::ToggleCloak => {
                self.state.cloak = !self.state.cloak;
                self.apply_title();
                let value = self.state.cloak.then_some("true");
                self.persist_pref(CLOAK_KEY, value);
            }
            Action::CopyToClipboard(text) => {
                match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
                    Ok(()) => {
                        let display = if text.chars().count() > 40 {
                            format!("{}…", text.chars().take(40).collect::<String>())
                        } else {
                            text.clone()
                        };
                        self.toast.success(format!("copied: {}", display));
                    }
                    Err(e) => {
                        warn!("clipboard error: {}", e);
                        self.toast.error(format!("clipboard error: {}", e));
                    }
                }
            }

            // ── System ────────────────────────────────────────────────────────
            Action::Quit => self.should_quit = true,

            // Handled at component level
            Action::ToggleSettings
            | Action::ToggleHelp
            | Action::CatalogChanged
            | Action::CodeRejected => {}
        }
    }

    // ── Catalog refresh ───────────────────────────────────────────────────────

    fn start_refresh(&mut self) {
        if let Some(ticket) = self.state.controller.begin_refresh() {
            self.spawn_load(ticket);
        }
    }

    fn spawn_load(&mut self, ticket: RefreshTicket) {
        let Some(tx) = self.msg_tx.clone() else {
            return;
        };
        let source = Arc::clone(&self.source);
        self.toast.spinner("loading zones…");
        debug!("refresh #{} started", ticket.seq());
        tokio::spawn(async move {
            let result = load_catalog(source.as_ref()).await;
            let _ = tx.send(AppMessage::CatalogLoaded(ticket, result)).await;
        });
    }

    // ── Preferences / terminal ────────────────────────────────────────────────

    fn persist_pref(&mut self, key: &str, value: Option<&str>) {
        let result = match value {
            Some(v) => self.prefs.set(key, v),
            None => self.prefs.remove(key),
        };
        if let Err(e) = result {
            warn!("could not save preference {}: {}", key, e);
            self.toast.warning(format!("could not save {}", key));
        }
    }

    fn apply_title(&self) {
        let title = if self.state.cloak { DECOY_TITLE } else { TITLE };
        if let Err(e) = execute!(io::stdout(), SetTitle(title)) {
            warn!("could not set terminal title: {}", e);
        }
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();
        let p = self.state.palette;
        frame.render_widget(Block::default().style(Style::default().bg(p.bg)), area);

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(FEATURED_PANE_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        header::draw(frame, outer[0], &self.state);
        status_bar::draw_separator(frame, outer[1], &p);
        self.search.draw(frame, outer[2], &p);

        let s = &self.state;
        self.featured.draw(
            frame,
            outer[3],
            self.focus.is_focused(ComponentId::Featured),
            s,
        );
        self.zones
            .draw(frame, outer[4], self.focus.is_focused(ComponentId::Zones), s);
        self.pane_areas.featured = outer[3];
        self.pane_areas.zones = outer[4];

        status_bar::draw_keys_bar(frame, outer[5], s.input_mode, &p);

        // ── Overlays (on top of everything) ──────────────────────────────────
        self.viewer.draw(frame, area, true, s);
        self.settings.draw(frame, area, true, s);
        self.help.draw(frame, area, true, s);
        self.access_prompt.draw(frame, area, true, s);

        // ── Toast notifications (topmost layer) ──────────────────────────────
        self.toast.draw(frame, area, &p);
    }
}

/// Theme and cloak flag as stored in the preferences store.
pub fn load_prefs(prefs: &dyn KeyValueStore) -> (Theme, bool) {
    let theme = prefs
        .get(THEME_KEY)
        .map(|v| Theme::from_label(&v))
        .unwrap_or_default();
    let cloak = prefs.get(CLOAK_KEY).as_deref() == Some("true");
    (theme, cloak)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zone_proto::store::MemoryStore;

    #[test]
    fn prefs_default_to_dark_and_uncloaked() {
        let mut store = MemoryStore::new();
        assert_eq!(load_prefs(&store), (Theme::Dark, false));

        store.set(THEME_KEY, "light").unwrap();
        store.set(CLOAK_KEY, "true").unwrap();
        assert_eq!(load_prefs(&store), (Theme::Light, true));
    }

    #[test]
    fn hit_test_respects_bounds() {
        let r = Rect::new(2, 3, 4, 2);
        assert!(hit(r, 2, 3));
        assert!(hit(r, 5, 4));
        assert!(!hit(r, 6, 4));
        assert!(!hit(r, 2, 5));
        assert!(!hit(Rect::default(), 0, 0));
    }
}
