//! Page source abstraction layer.
//!
//! This module defines the [`PageSource`] trait and the common [`Record`]
//! type.  Concrete sources live in sub-modules (currently only [`http`]).
//!
//! ## For contributors — adding a new source
//!
//! 1. Create a new file in this directory (e.g. `fs.rs` to read pages from a
//!    local directory).
//! 2. Define a struct and implement [`PageSource`] for it.
//! 3. Add `mod fs;` below and re-export your struct in the `pub use` block.
//!
//! The loader, the store and the UI never look at where bytes come from.

use std::future::Future;

mod http;
mod record;

pub use http::HttpPageSource;
pub use record::{parse_page, ParsedPage, Record, RecordId};

use crate::error::FetchError;

/// Trait that every page source must implement.
///
/// The loader calls [`fetch_page()`](PageSource::fetch_page) from a task on
/// the tokio runtime, so implementations must be [`Send`] + [`Sync`] and
/// return a [`Send`] future.
///
/// ## Implementing a new source
///
/// ```ignore
/// pub struct MySource { /* config fields */ }
///
/// impl PageSource for MySource {
///     fn name(&self) -> &str { "my-source" }
///
///     async fn fetch_page(&self, page: u32) -> Result<Vec<u8>, FetchError> {
///         // Perform HTTP / IO and return the raw JSON body of `page`.
///         todo!()
///     }
/// }
/// ```
pub trait PageSource: Send + Sync {
    /// Human-readable label used in log lines.
    fn name(&self) -> &str;

    /// Fetch the raw body of page `page` (numbered from 1).
    ///
    /// Parsing is the caller's job so that every source shares the same
    /// record validation.
    fn fetch_page(&self, page: u32) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}
