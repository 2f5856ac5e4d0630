use anyhow::{bail, Result};
use hkexnews_lib::types::AnnouncementRecord;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    pub fn parse(input: &str) -> Result<Self> {
        match input.trim().to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "markdown" | "md" => Ok(Self::Markdown),
            other => bail!(
                "unknown output format '{}'. Valid values: table, json, csv, markdown",
                other
            ),
        }
    }
}

#[derive(Tabled, Serialize)]
struct AnnouncementRow {
    #[tabled(rename = "Released")]
    #[serde(rename = "Released")]
    released: String,
    #[tabled(rename = "Code")]
    #[serde(rename = "Code")]
    stock_code: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    stock_name: String,
    #[tabled(rename = "Title")]
    #[serde(rename = "Title")]
    title: String,
    #[tabled(rename = "Document")]
    #[serde(rename = "Document")]
    document: String,
}

/// Flat CSV shape: the full record, with the release time in both forms.
#[derive(Serialize)]
struct AnnouncementCsvRow<'a> {
    id: &'a str,
    stock_code: &'a str,
    stock_name: &'a str,
    title: &'a str,
    title_extension: &'a str,
    document_url: &'a str,
    published_at_text: &'a str,
    published_at_epoch: i64,
}

fn build_announcement_rows(records: &[AnnouncementRecord]) -> Vec<AnnouncementRow> {
    records
        .iter()
        .map(|r| AnnouncementRow {
            released: r.published_at.format("%Y-%m-%d %H:%M").to_string(),
            stock_code: r.stock_code.clone(),
            stock_name: r.stock_name.clone(),
            title: display_title(r),
            document: r.document_url.clone().unwrap_or_else(|| "-".to_string()),
        })
        .collect()
}

fn display_title(record: &AnnouncementRecord) -> String {
    match (record.title.is_empty(), record.title_extension.is_empty()) {
        (_, true) => record.title.clone(),
        (true, false) => record.title_extension.clone(),
        (false, false) => format!("{}: {}", record.title_extension, record.title),
    }
}

pub fn print_announcements(records: &[AnnouncementRecord], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print_announcements_table(records),
        OutputFormat::Json => print_json(&records),
        OutputFormat::Csv => print_announcements_csv(records)?,
        OutputFormat::Markdown => print_announcements_markdown(records),
    }
    Ok(())
}

pub fn print_announcements_table(records: &[AnnouncementRecord]) {
    println!("{}", Table::new(build_announcement_rows(records)));
}

pub fn print_announcements_markdown(records: &[AnnouncementRecord]) {
    let mut table = Table::new(build_announcement_rows(records));
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_announcements_csv(records: &[AnnouncementRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    write_announcements_csv(&mut wtr, records)?;
    wtr.flush()?;
    Ok(())
}

fn write_announcements_csv<W: std::io::Write>(
    wtr: &mut csv::Writer<W>,
    records: &[AnnouncementRecord],
) -> Result<()> {
    for r in records {
        wtr.serialize(AnnouncementCsvRow {
            id: &r.id,
            stock_code: &r.stock_code,
            stock_name: &r.stock_name,
            title: &r.title,
            title_extension: &r.title_extension,
            document_url: r.document_url.as_deref().unwrap_or_default(),
            published_at_text: &r.published_at_text,
            published_at_epoch: r.published_at_epoch(),
        })?;
    }
    Ok(())
}

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}
