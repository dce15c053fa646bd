//! Paginated content store.
//!
//! [`ContentStore`] owns the growing list of records, the next page cursor
//! and the in-flight flag, and decides whether a visibility trigger should
//! start a fetch.  It performs no I/O: [`crate::loader::Loader`] runs the
//! fetch and feeds the outcome back through [`ContentStore::finish_load`].
//!
//! ```text
//!            begin_load (trigger holds)
//!   Idle(p) ───────────────────────────► Loading(p)
//!     ▲  ▲                                  │   │
//!     │  └───────── finish_load(Err) ───────┘   │
//!     │                                         │ finish_load(Ok)
//!   Idle(p+1) ◄─────────────────────────────────┘
//!
//!   Idle(p) with p > max_pages  ==  Exhausted
//! ```

use std::fmt;

use tracing::{info, warn};

use crate::error::FetchError;
use crate::source::{ParsedPage, Record, RecordId};

/// Number of trailing items whose appearance triggers the next page.
pub const DEFAULT_TRIGGER_WINDOW: usize = 4;

/// Number of pages the default content endpoint serves.
pub const DEFAULT_MAX_PAGES: u32 = 10;

/// Tunables for a [`ContentStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Highest page number that will ever be requested.
    pub max_pages: u32,
    /// How many of the last items count as "near the end of the list".
    pub trigger_window: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            trigger_window: DEFAULT_TRIGGER_WINDOW,
        }
    }
}

/// Where the store is in its load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Ready to fetch `next_page` on the next qualifying trigger.
    Idle { next_page: u32 },
    /// `page` has been requested and its completion is outstanding.
    Loading { page: u32 },
    /// Every page up to the maximum has been loaded.
    Exhausted,
}

/// Observable snapshot of a store, published after every state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStatus {
    pub phase: Phase,
    pub item_count: usize,
    pub pages_loaded: u32,
    pub max_pages: u32,
    /// Message of the most recent failed fetch, cleared by the next success.
    pub last_error: Option<String>,
}

impl fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.phase, &self.last_error) {
            (Phase::Loading { page }, _) => {
                write!(f, "Loading page {page}/{}…", self.max_pages)
            }
            (Phase::Exhausted, _) => write!(f, "All {} pages loaded", self.pages_loaded),
            (Phase::Idle { next_page }, Some(err)) => {
                write!(f, "Page {next_page} failed: {err} (scroll or press r to retry)")
            }
            (Phase::Idle { .. }, None) if self.pages_loaded == 0 => f.write_str("Starting…"),
            (Phase::Idle { .. }, None) => {
                write!(f, "Loaded {}/{} pages", self.pages_loaded, self.max_pages)
            }
        }
    }
}

/// The ordered record list plus its pagination cursor.
#[derive(Debug)]
pub struct ContentStore {
    items: Vec<Record>,
    next_page: u32,
    loading: bool,
    config: StoreConfig,
    last_error: Option<String>,
}

impl ContentStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            items: Vec::new(),
            next_page: 1,
            loading: false,
            config,
            last_error: None,
        }
    }

    /// All records loaded so far, in page order.
    pub fn items(&self) -> &[Record] {
        &self.items
    }

    pub fn next_page(&self) -> u32 {
        self.next_page
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn config(&self) -> StoreConfig {
        self.config
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading {
                page: self.next_page,
            }
        } else if self.next_page > self.config.max_pages {
            Phase::Exhausted
        } else {
            Phase::Idle {
                next_page: self.next_page,
            }
        }
    }

    pub fn status(&self) -> StoreStatus {
        StoreStatus {
            phase: self.phase(),
            item_count: self.items.len(),
            pages_loaded: self.next_page - 1,
            max_pages: self.config.max_pages,
            last_error: self.last_error.clone(),
        }
    }

    /// Whether a trigger from `visible` (or the initial load, for `None`)
    /// should fetch the next page.
    ///
    /// Only the last `trigger_window` items qualify.  With fewer items than
    /// the window, every item qualifies.
    pub fn should_load_more(&self, visible: Option<RecordId>) -> bool {
        if self.loading || self.next_page > self.config.max_pages {
            return false;
        }
        let Some(id) = visible else {
            return true;
        };
        let start = self.items.len().saturating_sub(self.config.trigger_window);
        self.items[start..].iter().any(|item| item.id() == id)
    }

    /// Enter the loading state if the trigger holds.
    ///
    /// Returns the page the caller must now fetch, or `None` when the
    /// trigger was dropped.  Every `Some(page)` must eventually be answered
    /// with exactly one [`finish_load`](Self::finish_load) for that page.
    pub fn begin_load(&mut self, visible: Option<RecordId>) -> Option<u32> {
        if !self.should_load_more(visible) {
            return None;
        }
        self.loading = true;
        Some(self.next_page)
    }

    /// Apply the outcome of fetching `page`.
    ///
    /// Returns `false` (and changes nothing) if `page` is not the page
    /// currently in flight.
    pub fn finish_load(&mut self, page: u32, outcome: Result<ParsedPage, FetchError>) -> bool {
        if !self.loading || page != self.next_page {
            warn!(
                page,
                in_flight = self.loading.then_some(self.next_page),
                "ignoring completion for a page that is not in flight"
            );
            return false;
        }

        match outcome {
            Ok(parsed) => {
                info!(
                    page,
                    added = parsed.records.len(),
                    skipped = parsed.skipped,
                    total = self.items.len() + parsed.records.len(),
                    "page loaded"
                );
                self.items.extend(parsed.records);
                self.next_page += 1;
                self.last_error = None;
            }
            Err(e) => {
                warn!(page, error = %e, "page fetch failed; will retry on next trigger");
                self.last_error = Some(e.to_string());
            }
        }
        self.loading = false;
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
