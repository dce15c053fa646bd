//! content-cards — lazily paged content cards from a JSON endpoint.
//!
//! ## Architecture overview
//!
//! ```text
//!  notify_visible()  ┌──────────┐ begin_load ┌──────────┐
//! ─────────────────► │ loader   │ ─────────► │  store   │
//!   pump() / watch   │ (owner)  │ finish_load│ (state)  │
//! ◄───────────────── └──────────┘ ─────────► └──────────┘
//!                      │  ▲ PageMsg (channel)
//!              spawn   ▼  │
//!                    ┌──────────┐  GET {base}{page}.json
//!                    │ source/  │ ─────────────────────►
//!                    └──────────┘
//! ```
//!
//! * **`store`** — the pagination state machine; no I/O.
//! * **`source/`** — the `PageSource` trait, the HTTP implementation and
//!   record parsing.
//! * **`loader`** — runs fetches on tokio and applies their results on the
//!   owning thread.
//! * **`generate`** — offline job that produces the paged JSON files.
//! * **`config`**, **`logging`**, **`error`** — the usual plumbing.

pub mod config;
pub mod error;
pub mod generate;
pub mod loader;
pub mod logging;
pub mod source;
pub mod store;

pub use error::{FetchError, GenerateError, RecordError};
pub use loader::Loader;
pub use source::{HttpPageSource, PageSource, Record, RecordId};
pub use store::{ContentStore, Phase, StoreConfig, StoreStatus};
