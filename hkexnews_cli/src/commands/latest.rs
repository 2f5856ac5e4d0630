//! The `latest` subcommand: today's announcement listing.

use anyhow::Result;
use clap::Args;
use hkexnews_lib::{fetch_latest, validation, Client, PortalLayout};

use crate::output::{print_announcements, OutputFormat};

#[derive(Args)]
pub struct LatestArgs {
    /// Only show announcements of these stock codes (comma-separated, e.g. 763,00005)
    #[arg(long)]
    pub stock: Option<String>,
}

pub async fn run(
    args: &LatestArgs,
    client: &Client,
    layout: &PortalLayout,
    format: &OutputFormat,
) -> Result<()> {
    let wanted = args
        .stock
        .as_deref()
        .map(|list| stock_filter(list, &layout.record.market_suffix))
        .transpose()?;

    let mut records = fetch_latest(client, layout).await?;
    if let Some(codes) = wanted {
        records.retain(|r| codes.contains(&r.stock_code));
    }

    print_announcements(&records, format)?;
    eprintln!("{} announcements", records.len());
    Ok(())
}

/// Validate a comma-separated code list into the suffixed form records carry.
fn stock_filter(list: &str, market_suffix: &str) -> Result<Vec<String>> {
    let codes = list
        .split(',')
        .map(|code| {
            validation::validate_stock_code(code).map(|c| format!("{}{}", c, market_suffix))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(codes)
}
