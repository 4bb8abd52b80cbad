//! Controller — the single owner of catalog, query and access state.
//!
//! Front ends read from it and feed it user input; network work happens
//! outside and comes back through `apply_refresh`. Each refresh carries a
//! ticket and only the most recently issued ticket may change state, so a
//! slow response can never overwrite a newer one.

use tracing::{debug, info, warn};

use crate::access::{AccessGate, GateError};
use crate::catalog::CatalogError;
use crate::protocol::{SortMode, Zone};
use crate::query::{self, Query, Selection, TagFilter};

/// Sequence number handed out by `begin_refresh`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Locked,
    Loading,
    Showing(usize),
    Error(String),
}

impl Status {
    pub fn label(&self) -> String {
        match self {
            Self::Locked => "Locked".to_string(),
            Self::Loading => "Loading zones…".to_string(),
            Self::Showing(1) => "1 zone".to_string(),
            Self::Showing(n) => format!("{} zones", n),
            Self::Error(reason) => format!("Error loading zones: {}", reason),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

pub struct Controller {
    gate: AccessGate,
    zones: Vec<Zone>,
    tags: Vec<String>,
    query: Query,
    selection: Selection,
    status: Status,
    last_issued: u64,
    loaded: bool,
}

impl Controller {
    pub fn new(gate: AccessGate) -> Self {
        let status = if gate.is_locked() {
            Status::Locked
        } else {
            Status::Loading
        };
        Self {
            gate,
            zones: Vec::new(),
            tags: Vec::new(),
            query: Query::default(),
            selection: Selection::default(),
            status,
            last_issued: 0,
            loaded: false,
        }
    }

    // ── Access ────────────────────────────────────────────────────────────────

    pub fn is_locked(&self) -> bool {
        self.gate.is_locked()
    }

    pub fn access_code(&self) -> String {
        self.gate.current_code()
    }

    /// Try to unlock. On success the caller gets a ticket for the first refresh.
    pub fn submit_code(&mut self, input: &str) -> Result<Option<RefreshTicket>, GateError> {
        let was_locked = self.gate.is_locked();
        self.gate.submit(input)?;
        if was_locked {
            Ok(self.begin_refresh())
        } else {
            Ok(None)
        }
    }

    // ── Refresh ───────────────────────────────────────────────────────────────

    /// Start a refresh. `None` while locked: the caller must not touch the network.
    pub fn begin_refresh(&mut self) -> Option<RefreshTicket> {
        if self.gate.is_locked() {
            debug!("refresh skipped: locked");
            return None;
        }
        self.last_issued += 1;
        if !self.loaded {
            self.status = Status::Loading;
        }
        Some(RefreshTicket(self.last_issued))
    }

    /// Apply a finished refresh. Returns false when the ticket is stale.
    pub fn apply_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<Zone>, CatalogError>,
    ) -> bool {
        if ticket.0 != self.last_issued {
            debug!(
                "dropping stale refresh #{} (latest #{})",
                ticket.0, self.last_issued
            );
            return false;
        }
        match result {
            Ok(zones) => {
                info!("refresh #{} applied: {} zones", ticket.0, zones.len());
                self.zones = zones;
                self.tags = query::distinct_tags(&self.zones);
                self.query.tag = std::mem::take(&mut self.query.tag).reconcile(&self.tags);
                self.loaded = true;
                self.recompute();
            }
            Err(e) => {
                warn!("refresh #{} failed: {}", ticket.0, e);
                self.status = Status::Error(e.to_string());
            }
        }
        true
    }

    // ── Query ─────────────────────────────────────────────────────────────────

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn set_search(&mut self, search: &str) {
        if self.query.search != search {
            self.query.search = search.to_string();
            self.recompute();
        }
    }

    pub fn set_tag(&mut self, tag: TagFilter) {
        self.query.tag = tag.reconcile(&self.tags);
        self.recompute();
    }

    pub fn cycle_tag(&mut self, forward: bool) {
        self.query.tag = self.query.tag.cycle(&self.tags, forward);
        self.recompute();
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.query.sort = sort;
        self.recompute();
    }

    fn recompute(&mut self) {
        if self.gate.is_locked() {
            return;
        }
        self.selection = query::select(&self.zones, &self.query);
        if self.loaded {
            self.status = Status::Showing(self.selection.len());
        }
    }

    // ── Read access ───────────────────────────────────────────────────────────

    /// Current selection; empty while locked.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn zone(&self, idx: usize) -> Option<&Zone> {
        if self.gate.is_locked() {
            return None;
        }
        self.zones.get(idx)
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn status(&self) -> &Status {
        &self.status
    }
}
