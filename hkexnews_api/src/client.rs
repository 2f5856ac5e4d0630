//! HTTP client for the HKEXnews listing and advanced-search endpoints.

use std::time::Duration;

use url::Url;

use crate::{query::FormPayload, user_agent::get_user_agent, Error};

/// Production origin of the portal.
pub const DEFAULT_BASE_URL: &str = "http://www.hkexnews.hk";

/// Listing of today's announcements, newest first.
pub const LATEST_PATH: &str = "/listedco/listconews/mainindex/SEHK_LISTEDCO_DATETIME_TODAY_C.HTM";

/// ASP.NET webforms advanced-search page. GET returns the empty form, POST
/// submits a search or a pager click.
pub const SEARCH_PATH: &str = "/listedco/listconews/advancedsearch/search_active_main_c.aspx";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the HKEXnews portal.
///
/// Every request carries a browser-like user agent picked once per client.
/// The client holds no session state; view-state tokens travel in the form
/// payloads built by [`crate::SearchQuery`] and [`crate::NextPageQuery`].
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    /// Creates a client pointing at the production portal.
    pub fn new() -> Result<Self, Error> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom origin. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::with_options(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom origin and request timeout.
    pub fn with_options(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let base_url = Url::parse(base_url.trim_end_matches('/')).map_err(|e| {
            tracing::error!("Invalid base URL {}: {}", base_url, e);
            Error::InvalidUrl(format!("{}: {}", base_url, e))
        })?;
        let http = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(timeout)
            .build()?;
        Ok(Self { base_url, http })
    }

    /// The origin that relative document links resolve against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, Error> {
        self.base_url
            .join(path)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", path, e)))
    }

    /// Fetches the latest-announcements listing page.
    pub async fn get_latest_page(&self) -> Result<String, Error> {
        self.get_html(LATEST_PATH).await
    }

    /// Fetches the empty advanced-search form.
    pub async fn get_search_page(&self) -> Result<String, Error> {
        self.get_html(SEARCH_PATH).await
    }

    /// Submits a form payload to the advanced-search endpoint.
    pub async fn post_search_form(&self, payload: &FormPayload) -> Result<String, Error> {
        let url = self.url(SEARCH_PATH)?;
        tracing::debug!(url = %url, fields = payload.len(), "POST search form");
        let resp = self
            .http
            .post(url)
            .header("accept", "text/html,application/xhtml+xml")
            .header("accept-language", "en-US,en;q=0.9")
            .header("origin", self.base_url.origin().ascii_serialization())
            .form(payload.as_pairs())
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to post search form: {}", e);
                Error::Transport(e)
            })?;
        read_html(resp).await
    }

    async fn get_html(&self, path: &str) -> Result<String, Error> {
        let url = self.url(path)?;
        tracing::debug!(url = %url, "GET");
        let resp = self
            .http
            .get(url)
            .header("accept", "text/html,application/xhtml+xml")
            .header("accept-language", "en-US,en;q=0.9")
            .header("cache-control", "no-cache")
            .header("pragma", "no-cache")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get {}: {}", path, e);
                Error::Transport(e)
            })?;
        read_html(resp).await
    }
}

async fn read_html(resp: reqwest::Response) -> Result<String, Error> {
    let status = resp.status();
    let body = resp.text().await.map_err(|e| {
        tracing::error!("Failed to read response body: {}", e);
        Error::Transport(e)
    })?;

    if !status.is_success() {
        let snippet = truncate_body(&body);
        tracing::error!("Request failed with status {}: {}", status, snippet);
        return Err(Error::HttpStatus {
            status: status.as_u16(),
            body: snippet,
        });
    }

    tracing::debug!(status = %status, body_len = body.len(), "response");
    Ok(body)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}
