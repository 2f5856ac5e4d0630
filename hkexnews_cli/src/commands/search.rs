//! The `search` subcommand: advanced search over a date range, all pages.

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use hkexnews_lib::{
    validation, Client, CrawlConfig, PortalLayout, SearchCrawler, SearchQuery, StopReason,
};
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;

use crate::output::{print_announcements, OutputFormat};

/// Arguments for the `search` subcommand.
#[derive(Args)]
pub struct SearchArgs {
    /// Stock code (1-5 digits, e.g. 00763 or 763.HK)
    #[arg(long)]
    pub stock: String,

    /// First release date to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: String,

    /// Last release date to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: String,

    /// Delay between result pages in milliseconds (at least 1000)
    #[arg(long, default_value = "4000")]
    pub delay_ms: u64,

    /// Stop after this many result pages
    #[arg(long)]
    pub max_pages: Option<u32>,
}

pub async fn run(
    args: &SearchArgs,
    client: &Client,
    layout: &PortalLayout,
    format: &OutputFormat,
    cancel: &CancellationToken,
) -> Result<()> {
    let stock_code = validation::validate_stock_code(&args.stock)?;
    let from = validation::validate_date(&args.from)?;
    let to = validation::validate_date(&args.to)?;
    validation::validate_date_range(from, to)?;
    let delay_ms = validation::validate_delay_ms(args.delay_ms)?;
    let max_pages = args
        .max_pages
        .map(validation::validate_max_pages)
        .transpose()?;

    let query = SearchQuery::new(&stock_code, from, to)?;
    let crawler = SearchCrawler::with_config(
        client,
        layout,
        CrawlConfig {
            page_delay: Duration::from_millis(delay_ms),
            max_pages,
        },
    );

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(format!(
        "searching {} from {} to {}...",
        stock_code, from, to
    ));

    let result = crawler.crawl(&query, cancel).await;
    pb.finish_and_clear();

    match result {
        Ok(outcome) => {
            print_announcements(&outcome.records, format)?;
            eprintln!(
                "{} announcements from {} page(s); {}",
                outcome.records.len(),
                outcome.pages_fetched,
                describe_stop(&outcome.stop)
            );
            Ok(())
        }
        Err(failure) => {
            if !failure.records.is_empty() {
                print_announcements(&failure.records, format)?;
                eprintln!(
                    "Partial results: {} announcements from {} page(s)",
                    failure.records.len(),
                    failure.pages_fetched
                );
            }
            Err(failure.into())
        }
    }
}

fn describe_stop(stop: &StopReason) -> String {
    match stop {
        StopReason::NoNextPage => "no more pages".to_string(),
        StopReason::WatermarkBeforeRange { watermark } => format!(
            "reached announcements released before the range ({})",
            watermark.format("%Y-%m-%d %H:%M")
        ),
        StopReason::PageLimit { pages } => format!("stopped at the {} page limit", pages),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_describe_stop() {
        assert_eq!(describe_stop(&StopReason::NoNextPage), "no more pages");
        assert_eq!(
            describe_stop(&StopReason::PageLimit { pages: 3 }),
            "stopped at the 3 page limit"
        );
        let watermark = Utc.with_ymd_and_hms(2018, 7, 3, 12, 0, 0).unwrap();
        assert!(describe_stop(&StopReason::WatermarkBeforeRange { watermark })
            .contains("2018-07-03 12:00"));
    }
}
