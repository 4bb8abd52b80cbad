//! Action enum — all user-initiated intents and internal events.

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    Featured,
    Zones,
    AccessPrompt,
    Viewer,
    Settings,
    Help,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Navigation ───────────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,
    FocusPane(ComponentId),

    // ── Query ────────────────────────────────────────────────────────────────
    OpenSearch,
    CloseSearch,
    SearchChanged(String),
    CycleTag(bool), // true = forward
    CycleSort(bool),

    // ── Catalog ──────────────────────────────────────────────────────────────
    Refresh,
    /// The controller's selection or status changed; lists re-clamp their cursors.
    CatalogChanged,

    // ── Access ───────────────────────────────────────────────────────────────
    SubmitCode(String),
    CodeRejected,

    // ── Viewer ───────────────────────────────────────────────────────────────
    OpenZone(usize), // catalog index
    CloseZone,
    LaunchBrowser,

    // ── UI toggles ───────────────────────────────────────────────────────────
    ToggleTheme,
    ToggleCloak,
    ToggleSettings,
    ToggleHelp,
    CopyToClipboard(String),

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
}
