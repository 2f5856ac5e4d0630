mod commands;
mod output;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hkexnews_lib::{hkexnews_api::DEFAULT_BASE_URL, Client, PortalLayout};
use tokio_util::sync::CancellationToken;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "hkexnews")]
#[command(about = "Fetch listed-company announcements from HKEXnews")]
struct Cli {
    /// Output format: table, json, csv or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Portal origin (falls back to HKEXNEWS_BASE_URL, then the public site)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// YAML file replacing the built-in portal layout
    #[arg(long, global = true)]
    layout: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30", global = true)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List today's announcements
    Latest(commands::latest::LatestArgs),
    /// Search announcements of one stock over a date range
    Search(commands::search::SearchArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hkexnews=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.output)?;

    let base_url = cli
        .base_url
        .clone()
        .or_else(|| std::env::var("HKEXNEWS_BASE_URL").ok())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let client = Client::with_options(&base_url, Duration::from_secs(cli.timeout_secs))?;

    let layout = match &cli.layout {
        Some(path) => PortalLayout::load(path)?,
        None => PortalLayout::embedded()?,
    };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping after the current request");
            on_interrupt.cancel();
        }
    });

    match &cli.command {
        Commands::Latest(args) => commands::latest::run(args, &client, &layout, &format).await?,
        Commands::Search(args) => {
            commands::search::run(args, &client, &layout, &format, &cancel).await?
        }
    }

    Ok(())
}
