use std::ops::Range;

use ratatui::widgets::ListState;

use content_cards::StoreStatus;

pub struct App {
    /// List selection state for scrolling.
    pub list_state: ListState,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Status bar text.
    pub status: String,
    /// Number of cards the store currently holds.
    item_count: usize,
    /// Pages loaded as of the last status update.
    pages_loaded: u32,
    /// Card indices on screen after the last draw.
    viewport: Range<usize>,
    /// Card indices already reported as visible.
    announced: Range<usize>,
}

impl App {
    pub fn new() -> Self {
        Self {
            list_state: ListState::default(),
            quit: false,
            status: "Starting…".into(),
            item_count: 0,
            pages_loaded: 0,
            viewport: 0..0,
            announced: 0..0,
        }
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Take in a new store snapshot.
    ///
    /// After a page lands the cards on screen are announced again, so that
    /// an end-of-list card that was already showing can trigger the page
    /// after it.
    pub fn apply_status(&mut self, status: &StoreStatus) {
        self.item_count = status.item_count;
        self.status = status.to_string();
        if status.pages_loaded != self.pages_loaded {
            self.pages_loaded = status.pages_loaded;
            self.reannounce();
        }
    }

    // -- visibility ----------------------------------------------------------

    /// Record which cards the last draw put on screen.
    pub fn set_viewport(&mut self, viewport: Range<usize>) {
        self.viewport = viewport;
    }

    /// Indices that came into view since the previous call.
    pub fn newly_visible(&mut self) -> Vec<usize> {
        let fresh = self
            .viewport
            .clone()
            .filter(|i| !self.announced.contains(i))
            .collect();
        self.announced = self.viewport.clone();
        fresh
    }

    /// Forget what was announced; every visible card is reported again.
    pub fn reannounce(&mut self) {
        self.announced = 0..0;
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        if self.item_count == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.item_count - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.item_count == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if self.item_count > 0 {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if self.item_count > 0 {
            self.list_state.select(Some(self.item_count - 1));
        }
    }
}
