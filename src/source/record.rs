//! The content card type and page payload parsing.
//!
//! A page is a JSON array of objects.  Each object becomes one [`Record`] if
//! it carries every required string field; objects that don't are dropped
//! on their own without failing the rest of the page.

use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::error::{FetchError, RecordError};

/// Opaque identity of a [`Record`], assigned when it is parsed.
pub type RecordId = Uuid;

/// One content card.
///
/// Records are immutable once parsed: fields are only reachable through
/// accessors, and the identifier is generated locally so that two identical
/// server entries are still distinct cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    id: RecordId,
    title: String,
    published_date: String,
    image_url: String,
    description: String,
}

impl Record {
    pub fn new(
        title: impl Into<String>,
        published_date: impl Into<String>,
        image_url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            published_date: published_date.into(),
            image_url: image_url.into(),
            description: description.into(),
        }
    }

    /// Build a record from one page entry.
    pub fn from_entry(entry: &Map<String, Value>) -> Result<Self, RecordError> {
        Ok(Self::new(
            string_field(entry, "title", &["title"])?,
            string_field(entry, "date", &["date", "publishedDate"])?,
            string_field(entry, "image", &["image"])?,
            string_field(entry, "description", &["description"])?,
        ))
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The publication date exactly as the server sent it.
    pub fn published_date(&self) -> &str {
        &self.published_date
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The publication date formatted for display.
    ///
    /// RFC 3339 timestamps and plain `YYYY-MM-DD` dates are normalised to
    /// `YYYY-MM-DD`; anything else is shown verbatim.
    pub fn display_date(&self) -> String {
        let raw = self.published_date.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return ts.format("%Y-%m-%d").to_string();
        }
        if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return day.format("%Y-%m-%d").to_string();
        }
        raw.to_string()
    }
}

/// First string value found under any of `keys`.
fn string_field(
    entry: &Map<String, Value>,
    field: &'static str,
    keys: &[&str],
) -> Result<String, RecordError> {
    keys.iter()
        .find_map(|key| entry.get(*key).and_then(Value::as_str))
        .map(String::from)
        .ok_or(RecordError::FieldMissing { field })
}

/// The valid records of one page, plus how many entries were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    pub records: Vec<Record>,
    pub skipped: usize,
}

/// Parse a page body.
///
/// Fails only when the body as a whole is unusable (not JSON, or not an
/// array of objects).  Individual entries missing a field are skipped.
pub fn parse_page(body: &[u8]) -> Result<ParsedPage, FetchError> {
    let entries: Vec<Map<String, Value>> = serde_json::from_slice(body)?;

    let mut page = ParsedPage {
        records: Vec::with_capacity(entries.len()),
        skipped: 0,
    };
    for (index, entry) in entries.iter().enumerate() {
        match Record::from_entry(entry) {
            Ok(record) => page.records.push(record),
            Err(e) => {
                debug!(index, error = %e, "skipping malformed record");
                page.skipped += 1;
            }
        }
    }
    Ok(page)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
