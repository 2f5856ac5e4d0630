//! The "latest announcements" listing: one page, no session state.

use hkexnews_api::types::AnnouncementRecord;
use hkexnews_api::Client;
use scraper::ElementRef;
use tracing::{info, warn};
use url::Url;

use crate::datetime::parse_published_at;
use crate::error::HkexNewsError;
use crate::layout::{compile, PortalLayout};
use crate::markup::{
    child_elements, collapse_whitespace, parse_document, strip_whitespace, text, text_with_breaks,
};
use crate::results::resolve_link;

/// Fetch and parse today's announcement listing.
pub async fn fetch_latest(
    client: &Client,
    layout: &PortalLayout,
) -> Result<Vec<AnnouncementRecord>, HkexNewsError> {
    let body = client.get_latest_page().await?;
    let records = parse_latest_page(&body, layout, client.base_url())?;
    info!(records = records.len(), "Fetched latest announcements");
    Ok(records)
}

/// Parse the listing. Every row of either alternating row class is one
/// announcement; rows with an unreadable release time are skipped.
pub fn parse_latest_page(
    body: &str,
    layout: &PortalLayout,
    origin: &Url,
) -> Result<Vec<AnnouncementRecord>, HkexNewsError> {
    let document = parse_document(body)?;
    let row_sel = compile(&layout.latest.row)?;
    let name_sel = compile(&layout.latest.stock_name)?;
    let link_sel = compile(&layout.latest.document_link)?;
    let headline_sel = compile(&layout.latest.headline)?;

    let mut records = Vec::new();
    for row in document.select(&row_sel) {
        let cells: Vec<ElementRef<'_>> = child_elements(row, "td").collect();
        if cells.len() < 4 {
            warn!(cells = cells.len(), "Listing row has too few cells, skipping");
            continue;
        }

        let published_at_text = strip_whitespace(&text_with_breaks(
            cells[0],
            &layout.record.line_break_separator,
        ));
        let Some(published_at) =
            parse_published_at(&published_at_text, &layout.record.datetime_format)
        else {
            warn!(raw = published_at_text, "Failed to parse release time, skipping row");
            continue;
        };

        let stock_code = format!("{}{}", text(cells[1]).trim(), layout.record.market_suffix);
        let stock_name = cells[2]
            .select(&name_sel)
            .next()
            .map(|el| collapse_whitespace(&text(el)))
            .unwrap_or_else(|| collapse_whitespace(&text(cells[2])));

        let link = row.select(&link_sel).next();
        let title_extension = link
            .map(|a| collapse_whitespace(&text(a)))
            .unwrap_or_default();
        let document_url = resolve_link(link.and_then(|a| a.value().attr("href")), origin);
        if document_url.is_none() {
            warn!(stock_code, "Listing row has no document link");
        }
        let title = cells[3]
            .select(&headline_sel)
            .next()
            .map(|el| collapse_whitespace(&text(el)))
            .unwrap_or_default();

        records.push(AnnouncementRecord::new(
            stock_code,
            stock_name,
            title,
            title_extension,
            document_url,
            published_at_text,
            published_at,
        ));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> PortalLayout {
        PortalLayout::embedded().unwrap()
    }

    fn origin() -> Url {
        Url::parse("http://www.hkexnews.hk").unwrap()
    }

    const LISTING: &str = r#"<html><body><table id="Table1">
<tr class="tableheader"><td>Release Time</td><td>Stock Code</td><td>Stock Short Name</td><td>Document</td></tr>
<tr class="row0">
  <td>21/05/2018<br>16:31</td>
  <td>00763</td>
  <td><nobr>ZTE</nobr></td>
  <td><div id="hdLine">Announcements and Notices -
      [Other - Business Update]</div>
    <a class="news" href="/listedco/listconews/SEHK/2018/0521/LTN20180521577.pdf">VOLUNTARY
      ANNOUNCEMENT</a></td>
</tr>
<tr class="row1">
  <td>21/05/2018<br>16:20</td>
  <td>00005</td>
  <td><nobr>HSBC HOLDINGS</nobr></td>
  <td><div>Monthly Returns</div><a class="news" href="/listedco/b.pdf">Monthly Return</a></td>
</tr>
<tr class="row0">
  <td>yesterday</td>
  <td>00001</td>
  <td><nobr>CKH HOLDINGS</nobr></td>
  <td><div>Circulars</div><a class="news" href="/listedco/c.pdf">Circular</a></td>
</tr>
<tr><td colspan="4">End of list</td></tr>
</table></body></html>"#;

    #[test]
    fn parses_both_row_classes() {
        let records = parse_latest_page(LISTING, &layout(), &origin()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].stock_code, "00763.HK");
        assert_eq!(records[1].stock_code, "00005.HK");
        assert_eq!(records[1].stock_name, "HSBC HOLDINGS");
    }

    #[test]
    fn normalizes_titles_and_links() {
        let records = parse_latest_page(LISTING, &layout(), &origin()).unwrap();
        let first = &records[0];
        assert_eq!(
            first.title,
            "Announcements and Notices - [Other - Business Update]"
        );
        assert_eq!(first.title_extension, "VOLUNTARY ANNOUNCEMENT");
        assert_eq!(
            first.document_url.as_deref(),
            Some("http://www.hkexnews.hk/listedco/listconews/SEHK/2018/0521/LTN20180521577.pdf")
        );
        assert_eq!(first.published_at_text, "21/05/2018-16:31");
        assert_eq!(first.published_at_epoch(), 1526920260);
    }

    #[test]
    fn same_document_same_id_as_search() {
        let records = parse_latest_page(LISTING, &layout(), &origin()).unwrap();
        assert_eq!(
            records[0].id,
            hkexnews_api::types::announcement_id(Some(
                "http://www.hkexnews.hk/listedco/listconews/SEHK/2018/0521/LTN20180521577.pdf"
            ))
        );
    }

    #[test]
    fn page_without_rows_is_empty() {
        let records =
            parse_latest_page("<html><body><p>No announcements</p></body></html>", &layout(), &origin())
                .unwrap();
        assert!(records.is_empty());
    }
}
