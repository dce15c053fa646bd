//! HTTP page source.
//!
//! Pages live at `{url_base}{page}.json`, e.g. with the default base
//! `https://…/fake-api/api-` page 3 is `https://…/fake-api/api-3.json`.

use tracing::debug;

use super::PageSource;
use crate::error::FetchError;

/// Fetches numbered JSON pages over HTTP with [`reqwest`].
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: reqwest::Client,
    url_base: String,
}

impl HttpPageSource {
    /// Create a new source.
    ///
    /// # Arguments
    ///
    /// * `url_base` — everything before the page number, including any
    ///   filename prefix (e.g. `http://localhost:8080/api-`).
    pub fn new(url_base: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url_base)
    }

    pub fn with_client(client: reqwest::Client, url_base: impl Into<String>) -> Self {
        Self {
            client,
            url_base: url_base.into(),
        }
    }

    pub fn page_url(&self, page: u32) -> String {
        format!("{}{page}.json", self.url_base)
    }
}

impl PageSource for HttpPageSource {
    fn name(&self) -> &str {
        &self.url_base
    }

    async fn fetch_page(&self, page: u32) -> Result<Vec<u8>, FetchError> {
        let url = self.page_url(page);
        debug!(%url, "requesting page");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                url,
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
