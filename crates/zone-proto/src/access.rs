//! Weekly access code and the gate that guards the gallery.
//!
//! The code is `"<year>-<isoWeek>"` for the current local date. It is a shared,
//! predictable value, not a credential.
//!
//! Gate lifecycle:
//!   start  -> Unlocked  if the session store holds `unlocked=true` for this week's code
//!   start  -> Locked    otherwise (stored code is refreshed, stale flag dropped)
//!   Locked -> Unlocked  on a submit matching the current code after trimming
//!
//! There is no way back to Locked within a run.

use chrono::{Datelike, Local, NaiveDate};
use thiserror::Error;
use tracing::{info, warn};

use crate::store::KeyValueStore;

pub const UNLOCKED_KEY: &str = "unlocked";
pub const CODE_KEY: &str = "access_code";

/// Source of "today". Swapped for a fixed date in tests.
pub trait Clock: Send {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Code for `date`: calendar year plus ISO-8601 week number, unpadded.
pub fn access_code_for(date: NaiveDate) -> String {
    format!("{}-{}", date.year(), date.iso_week().week())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Locked,
    Unlocked,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("incorrect access code")]
    WrongCode,
}

pub struct AccessGate {
    clock: Box<dyn Clock>,
    store: Box<dyn KeyValueStore>,
    state: GateState,
}

impl AccessGate {
    pub fn open(clock: Box<dyn Clock>, mut store: Box<dyn KeyValueStore>) -> Self {
        let current = access_code_for(clock.today());
        let flagged = store.get(UNLOCKED_KEY).as_deref() == Some("true");
        let stored = store.get(CODE_KEY);

        let state = if flagged && stored.as_deref() == Some(current.as_str()) {
            info!("session already unlocked for {}", current);
            GateState::Unlocked
        } else {
            if let Err(e) = store.set(CODE_KEY, &current) {
                warn!("failed to store access code: {}", e);
            }
            if let Err(e) = store.remove(UNLOCKED_KEY) {
                warn!("failed to clear unlock flag: {}", e);
            }
            GateState::Locked
        };

        Self {
            clock,
            store,
            state,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == GateState::Locked
    }

    /// Code accepted right now.
    pub fn current_code(&self) -> String {
        access_code_for(self.clock.today())
    }

    pub fn submit(&mut self, input: &str) -> Result<(), GateError> {
        if self.state == GateState::Unlocked {
            return Ok(());
        }
        let current = self.current_code();
        if input.trim() != current {
            info!("access code rejected");
            return Err(GateError::WrongCode);
        }

        if let Err(e) = self.store.set(UNLOCKED_KEY, "true") {
            warn!("failed to persist unlock flag: {}", e);
        }
        if let Err(e) = self.store.set(CODE_KEY, &current) {
            warn!("failed to persist access code: {}", e);
        }
        self.state = GateState::Unlocked;
        info!("gate unlocked for {}", current);
        Ok(())
    }
}
