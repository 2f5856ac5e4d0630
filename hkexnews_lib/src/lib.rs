//! Library layer for the HKEXnews fetcher: page parsers, the search
//! pagination driver, portal layout and input validation.
//!
//! Wraps the `hkexnews_api` client crate. Parsers are pure functions over
//! response bodies; only [`fetch_latest`] and [`SearchCrawler::crawl`] touch
//! the network.

pub mod crawl;
pub mod datetime;
pub mod error;
pub mod latest;
pub mod layout;
mod markup;
pub mod results;
pub mod validation;
pub mod viewstate;

pub use hkexnews_api;
pub use hkexnews_api::types;
pub use hkexnews_api::{Client, SearchQuery};

pub use crawl::{
    decide, CrawlConfig, CrawlFailure, CrawlOutcome, CrawlState, SearchCrawler, StopReason,
    Transition,
};
pub use error::HkexNewsError;
pub use latest::{fetch_latest, parse_latest_page};
pub use layout::{LayoutError, PortalLayout};
pub use results::{parse_results_page, ResultsPage};
pub use viewstate::extract_session_state;
