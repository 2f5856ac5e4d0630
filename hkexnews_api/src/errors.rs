//! Error types for the portal client and form builders.

use chrono::NaiveDate;

/// Errors that can occur when building or sending portal requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The HTTP request could not be completed (connection, timeout, body read).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The portal answered with a non-success status. `body` is a truncated snippet.
    #[error("request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// A base URL or endpoint path could not be turned into a URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// A date boundary was not in `YYYY-MM-DD` form.
    #[error("invalid {field} date '{input}'. Expected format: YYYY-MM-DD (e.g., 2018-07-04)")]
    InvalidDateFormat { field: &'static str, input: String },
    /// The lower date boundary is after the upper one.
    #[error("date range is reversed: {from} is after {to}")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },
}
