//! Background page loading.
//!
//! The [`Loader`] owns a [`ContentStore`] and a [`PageSource`].  When the
//! store accepts a trigger, the loader spawns one fetch task on the tokio
//! runtime.  The task fetches and parses the page, then sends the outcome
//! back over an [`mpsc`] channel.  Only the thread that owns the loader ever
//! touches the store: it drains the channel with [`Loader::pump`] (or awaits
//! [`Loader::next_completion`]), so two completions can never interleave
//! their mutations.
//!
//! ## For contributors
//!
//! There is no cancellation or timeout.  A task always reports back, and
//! that report is the only thing that clears the store's in-flight flag.  If the
//! loader is dropped first the send fails and the result is discarded.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::error::FetchError;
use crate::source::{parse_page, PageSource, ParsedPage, RecordId};
use crate::store::{ContentStore, StoreConfig, StoreStatus};

/// Messages sent from fetch tasks to the loader's owner.
#[derive(Debug)]
pub struct PageMsg {
    pub page: u32,
    pub outcome: Result<ParsedPage, FetchError>,
}

/// Drives a [`ContentStore`] against a [`PageSource`].
pub struct Loader<S> {
    store: ContentStore,
    source: Arc<S>,
    runtime: Handle,
    tx: mpsc::UnboundedSender<PageMsg>,
    rx: mpsc::UnboundedReceiver<PageMsg>,
    status: watch::Sender<StoreStatus>,
}

impl<S: PageSource + 'static> Loader<S> {
    /// Create a loader and immediately request the first page.
    pub fn new(config: StoreConfig, source: S, runtime: Handle) -> Self {
        let store = ContentStore::new(config);
        let (tx, rx) = mpsc::unbounded_channel();
        let (status, _) = watch::channel(store.status());

        let mut loader = Self {
            store,
            source: Arc::new(source),
            runtime,
            tx,
            rx,
            status,
        };
        loader.request_load_more(None);
        loader
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Subscribe to status snapshots.  The receiver starts with the current
    /// status marked as seen.
    pub fn subscribe(&self) -> watch::Receiver<StoreStatus> {
        self.status.subscribe()
    }

    /// Report that the record `visible` has come into view.
    pub fn notify_visible(&mut self, visible: RecordId) -> bool {
        self.request_load_more(Some(visible))
    }

    /// Fetch the next page if the store accepts the trigger.
    ///
    /// Returns `true` when a fetch was issued.
    pub fn request_load_more(&mut self, visible: Option<RecordId>) -> bool {
        let Some(page) = self.store.begin_load(visible) else {
            return false;
        };
        self.publish();

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            debug!(page, source = source.name(), "fetching page");
            let outcome = match source.fetch_page(page).await {
                Ok(body) => parse_page(&body),
                Err(e) => Err(e),
            };
            // A closed channel means the loader is gone; nobody is waiting.
            let _ = tx.send(PageMsg { page, outcome });
        });
        true
    }

    /// Apply every completion that has already arrived.  Never blocks.
    ///
    /// Returns how many completions were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(msg) = self.rx.try_recv() {
            self.apply(msg);
            applied += 1;
        }
        applied
    }

    /// Wait for the next completion and apply it.
    ///
    /// Returns the page it was for.  Only call this while a fetch is in
    /// flight, otherwise it waits forever.
    pub async fn next_completion(&mut self) -> Option<u32> {
        let msg = self.rx.recv().await?;
        let page = msg.page;
        self.apply(msg);
        Some(page)
    }

    fn apply(&mut self, msg: PageMsg) {
        self.store.finish_load(msg.page, msg.outcome);
        self.publish();
    }

    fn publish(&self) {
        self.status.send_replace(self.store.status());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
