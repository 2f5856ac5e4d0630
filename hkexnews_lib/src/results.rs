//! Parser for one page of advanced-search results.
//!
//! The results page nests everything in layout tables. The records sit in a
//! table inside one row of the form's layout table, and the pager sits in a
//! later row of the same table. Positions come from [`PortalLayout`].

use chrono::{DateTime, Utc};
use hkexnews_api::types::{AnnouncementRecord, SessionState};
use scraper::ElementRef;
use tracing::{debug, warn};
use url::Url;

use crate::datetime::parse_published_at;
use crate::error::HkexNewsError;
use crate::layout::{compile, PortalLayout};
use crate::markup::{
    child_elements, collapse_whitespace, first_descendant, parse_document, strip_whitespace, text,
    text_with_breaks,
};
use crate::viewstate::session_state_from_document;

/// Everything the pagination driver needs from one results page.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsPage {
    /// Records in table order (newest first).
    pub records: Vec<AnnouncementRecord>,
    /// Release time of the last row parsed on the page, the page's oldest
    /// entry as long as the portal keeps rows sorted newest first. `None`
    /// when no row parsed.
    pub watermark: Option<DateTime<Utc>>,
    /// Whether the pager offers a "next page" control.
    pub has_next_page: bool,
    /// Session state to echo on the next request.
    pub session: SessionState,
}

/// Parse one results page. Document links resolve against `origin`.
///
/// Rows with an unreadable release time are skipped with a warning; a row
/// without a document link is kept with `document_url: None`.
pub fn parse_results_page(
    body: &str,
    layout: &PortalLayout,
    origin: &Url,
) -> Result<ResultsPage, HkexNewsError> {
    let document = parse_document(body)?;
    let session = session_state_from_document(&document, layout)?;

    let form_sel = compile(&layout.search.form)?;
    let layout_rows: Vec<ElementRef<'_>> = document
        .select(&form_sel)
        .next()
        .and_then(|form| child_elements(form, "table").nth(layout.search.layout_table_index))
        .map(|table| {
            child_elements(table, "tbody")
                .flat_map(|tbody| child_elements(tbody, "tr"))
                .collect()
        })
        .unwrap_or_default();

    if layout_rows.is_empty() {
        warn!("Results layout table not found in response");
    }

    let mut records = Vec::new();
    let mut watermark = None;
    if let Some(records_row) = layout_rows.get(layout.search.records_row_index) {
        let row_sel = compile(&format!(
            "tbody > tr[{}]",
            layout.search.data_row_attribute
        ))?;
        for row in records_row.select(&row_sel) {
            if let Some(record) = parse_row(row, layout, origin) {
                watermark = Some(record.published_at);
                records.push(record);
            }
        }
    }

    let has_next_page = layout_rows
        .get(layout.search.navigation_row_index)
        .is_some_and(|row| has_next_control(*row, layout));

    debug!(
        records = records.len(),
        ?watermark,
        has_next_page,
        "parsed results page"
    );

    Ok(ResultsPage {
        records,
        watermark,
        has_next_page,
        session,
    })
}

fn parse_row(row: ElementRef<'_>, layout: &PortalLayout, origin: &Url) -> Option<AnnouncementRecord> {
    let cells: Vec<ElementRef<'_>> = child_elements(row, "td").collect();
    if cells.len() < 4 {
        warn!(cells = cells.len(), "Results row has too few cells, skipping");
        return None;
    }

    let time_el = first_descendant(cells[0], "span").unwrap_or(cells[0]);
    let published_at_text = strip_whitespace(&text_with_breaks(
        time_el,
        &layout.record.line_break_separator,
    ));
    let Some(published_at) = parse_published_at(&published_at_text, &layout.record.datetime_format)
    else {
        warn!(raw = published_at_text, "Failed to parse release time, skipping row");
        return None;
    };

    let stock_code = format!(
        "{}{}",
        span_text(cells[1]).trim(),
        layout.record.market_suffix
    );
    let stock_name = collapse_whitespace(&span_text(cells[2]));

    let title = first_descendant(cells[3], "span")
        .map(|span| collapse_whitespace(&text(span)))
        .unwrap_or_default();
    let anchor = first_descendant(cells[3], "a");
    let title_extension = anchor
        .map(|a| collapse_whitespace(&text(a)))
        .unwrap_or_default();
    let document_url = resolve_link(anchor.and_then(|a| a.value().attr("href")), origin);
    if document_url.is_none() {
        warn!(
            stock_code,
            published_at = published_at_text,
            "Results row has no document link"
        );
    }

    Some(AnnouncementRecord::new(
        stock_code,
        stock_name,
        title,
        title_extension,
        document_url,
        published_at_text,
        published_at,
    ))
}

fn span_text(cell: ElementRef<'_>) -> String {
    text(first_descendant(cell, "span").unwrap_or(cell))
}

pub(crate) fn resolve_link(href: Option<&str>, origin: &Url) -> Option<String> {
    let href = href.map(str::trim).filter(|h| !h.is_empty())?;
    match origin.join(href) {
        Ok(url) => Some(url.into()),
        Err(e) => {
            warn!(href, error = %e, "Failed to resolve document link");
            None
        }
    }
}

/// True when a right-aligned pager cell holds an input named like the next button.
fn has_next_control(row: ElementRef<'_>, layout: &PortalLayout) -> bool {
    let search = &layout.search;
    row.descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "td")
        .filter(|td| {
            td.value()
                .attr("align")
                .is_some_and(|a| a.eq_ignore_ascii_case(&search.navigation_cell_align))
        })
        .any(|td| {
            td.descendants()
                .filter_map(ElementRef::wrap)
                .filter(|el| el.value().name() == "input")
                .any(|input| {
                    input
                        .value()
                        .attr("name")
                        .is_some_and(|n| n.contains(search.next_control_marker.as_str()))
                })
        })
}
