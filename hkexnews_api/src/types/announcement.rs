use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

/// One disclosure filing as listed on the portal.
///
/// `id` is derived from `document_url` and nothing else, so the same filing
/// fetched twice (from the latest listing or from a search) yields the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementRecord {
    pub id: String,
    /// Issuer code with the market suffix, e.g. `00763.HK`.
    pub stock_code: String,
    pub stock_name: String,
    pub title: String,
    /// Secondary label rendered next to the title (the document link text).
    pub title_extension: String,
    /// Absolute link to the filing. `None` when the row carries no document.
    pub document_url: Option<String>,
    /// Release time as rendered, `DD/MM/YYYY-HH:MM`.
    pub published_at_text: String,
    #[serde(rename = "published_at_epoch", with = "chrono::serde::ts_seconds")]
    pub published_at: DateTime<Utc>,
}

impl AnnouncementRecord {
    /// Builds a record, deriving its id from `document_url`.
    pub fn new(
        stock_code: String,
        stock_name: String,
        title: String,
        title_extension: String,
        document_url: Option<String>,
        published_at_text: String,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: announcement_id(document_url.as_deref()),
            stock_code,
            stock_name,
            title,
            title_extension,
            document_url,
            published_at_text,
            published_at,
        }
    }

    /// Release time as seconds since the Unix epoch.
    pub fn published_at_epoch(&self) -> i64 {
        self.published_at.timestamp()
    }
}

/// Hex SHA-1 of the document URL. Rows without a document hash the empty string.
pub fn announcement_id(document_url: Option<&str>) -> String {
    hex::encode(Sha1::digest(document_url.unwrap_or_default().as_bytes()))
}
