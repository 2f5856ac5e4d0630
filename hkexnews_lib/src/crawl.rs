//! Pagination driver for the advanced search.
//!
//! A crawl walks `Searching -> PageFetched -> (Continuing -> PageFetched)* ->
//! Stopped | Failed`. Requests are strictly sequential and run on the caller's
//! task; the only state carried between pages is the latest [`SessionState`]
//! and the accumulated records.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use hkexnews_api::types::{AnnouncementRecord, SessionState};
use hkexnews_api::{Client, FormQuery, NextPageQuery, SearchQuery};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::datetime::start_of_day;
use crate::error::HkexNewsError;
use crate::layout::PortalLayout;
use crate::results::{parse_results_page, ResultsPage};
use crate::viewstate::extract_session_state;

/// Delay between page requests unless configured otherwise.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(4);

/// Tuning knobs for one crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Wait before every next-page request.
    pub page_delay: Duration,
    /// Stop after this many result pages, whatever the pager says.
    pub max_pages: Option<u32>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            page_delay: DEFAULT_PAGE_DELAY,
            max_pages: None,
        }
    }
}

/// Why a crawl finished without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The last page had no "next" control.
    NoNextPage,
    /// The last page reached back before the start of the requested range.
    WatermarkBeforeRange { watermark: DateTime<Utc> },
    /// The configured page limit was reached.
    PageLimit { pages: u32 },
}

/// Driver states, logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    Searching,
    PageFetched { page: u32 },
    Continuing { next_page: u32 },
    Stopped(StopReason),
    Failed,
}

/// Decision taken after a page has been fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Continue,
    Stop(StopReason),
}

/// Decide whether to request another page.
///
/// Continue only while the pager offers a next page, the page's watermark is
/// not earlier than `from_date` 00:00 UTC and the page limit is not reached.
/// A page without any parsed row has no watermark and does not stop the crawl
/// on its own.
pub fn decide(
    page: &ResultsPage,
    from_date: NaiveDate,
    pages_fetched: u32,
    max_pages: Option<u32>,
) -> Transition {
    if !page.has_next_page {
        return Transition::Stop(StopReason::NoNextPage);
    }
    if let Some(watermark) = page.watermark {
        if watermark < start_of_day(from_date) {
            return Transition::Stop(StopReason::WatermarkBeforeRange { watermark });
        }
    }
    if let Some(max) = max_pages {
        if pages_fetched >= max {
            return Transition::Stop(StopReason::PageLimit {
                pages: pages_fetched,
            });
        }
    }
    Transition::Continue
}

/// A finished crawl.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlOutcome {
    pub records: Vec<AnnouncementRecord>,
    pub pages_fetched: u32,
    pub stop: StopReason,
}

/// A crawl that hit an error. Carries whatever was collected before it.
#[derive(Debug, thiserror::Error)]
#[error("crawl failed after {pages_fetched} page(s) with {} record(s)", .records.len())]
pub struct CrawlFailure {
    pub records: Vec<AnnouncementRecord>,
    pub pages_fetched: u32,
    #[source]
    pub error: HkexNewsError,
}

#[derive(Default)]
struct Progress {
    records: Vec<AnnouncementRecord>,
    pages_fetched: u32,
}

/// Drives one search through all of its result pages.
#[derive(Debug, Clone)]
pub struct SearchCrawler<'a> {
    client: &'a Client,
    layout: &'a PortalLayout,
    config: CrawlConfig,
}

impl<'a> SearchCrawler<'a> {
    pub fn new(client: &'a Client, layout: &'a PortalLayout) -> Self {
        Self::with_config(client, layout, CrawlConfig::default())
    }

    pub fn with_config(client: &'a Client, layout: &'a PortalLayout, config: CrawlConfig) -> Self {
        Self {
            client,
            layout,
            config,
        }
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Run the search to completion.
    ///
    /// Cancelling `cancel` aborts before the next request or during the
    /// pacing wait; the failure then carries the records fetched so far.
    pub async fn crawl(
        &self,
        query: &SearchQuery,
        cancel: &CancellationToken,
    ) -> Result<CrawlOutcome, CrawlFailure> {
        let mut progress = Progress::default();
        match self.run(query, cancel, &mut progress).await {
            Ok(stop) => {
                enter(CrawlState::Stopped(stop));
                info!(
                    stock_code = query.stock_code(),
                    pages = progress.pages_fetched,
                    records = progress.records.len(),
                    ?stop,
                    "Search crawl finished"
                );
                Ok(CrawlOutcome {
                    records: progress.records,
                    pages_fetched: progress.pages_fetched,
                    stop,
                })
            }
            Err(error) => {
                enter(CrawlState::Failed);
                tracing::error!(
                    stock_code = query.stock_code(),
                    pages = progress.pages_fetched,
                    "Search crawl failed: {}",
                    error
                );
                Err(CrawlFailure {
                    records: progress.records,
                    pages_fetched: progress.pages_fetched,
                    error,
                })
            }
        }
    }

    async fn run(
        &self,
        query: &SearchQuery,
        cancel: &CancellationToken,
        progress: &mut Progress,
    ) -> Result<StopReason, HkexNewsError> {
        enter(CrawlState::Searching);
        ensure_active(cancel)?;
        let form_page = self.client.get_search_page().await?;
        let session = extract_session_state(&form_page, self.layout)?;
        require_tokens(&session, "search form")?;

        ensure_active(cancel)?;
        let mut body = self.client.post_search_form(&query.to_form(&session)).await?;

        loop {
            let page = parse_results_page(&body, self.layout, self.client.base_url())?;
            progress.pages_fetched += 1;
            enter(CrawlState::PageFetched {
                page: progress.pages_fetched,
            });
            info!(
                page = progress.pages_fetched,
                records = page.records.len(),
                watermark = ?page.watermark,
                has_next_page = page.has_next_page,
                "Fetched results page"
            );

            let transition = decide(
                &page,
                query.from_date(),
                progress.pages_fetched,
                self.config.max_pages,
            );
            let ResultsPage {
                records, session, ..
            } = page;
            progress.records.extend(records);

            if let Transition::Stop(reason) = transition {
                return Ok(reason);
            }

            enter(CrawlState::Continuing {
                next_page: progress.pages_fetched + 1,
            });
            require_tokens(&session, "results page")?;
            self.pace(cancel).await?;
            ensure_active(cancel)?;
            body = self
                .client
                .post_search_form(&NextPageQuery.to_form(&session))
                .await?;
        }
    }

    async fn pace(&self, cancel: &CancellationToken) -> Result<(), HkexNewsError> {
        if self.config.page_delay.is_zero() {
            return Ok(());
        }
        debug!(delay_ms = self.config.page_delay.as_millis() as u64, "pacing");
        tokio::select! {
            _ = cancel.cancelled() => Err(HkexNewsError::Cancelled),
            _ = tokio::time::sleep(self.config.page_delay) => Ok(()),
        }
    }
}

fn enter(state: CrawlState) {
    debug!(?state, "crawl transition");
}

fn ensure_active(cancel: &CancellationToken) -> Result<(), HkexNewsError> {
    if cancel.is_cancelled() {
        return Err(HkexNewsError::Cancelled);
    }
    Ok(())
}

fn require_tokens(session: &SessionState, origin: &str) -> Result<(), HkexNewsError> {
    if session.has_continuity_tokens() {
        return Ok(());
    }
    Err(HkexNewsError::MissingSessionState(format!(
        "{} did not carry __VIEWSTATE and __VIEWSTATEGENERATOR",
        origin
    )))
}
