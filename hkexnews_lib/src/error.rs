//! Error types for the library layer.

use std::fmt;

use crate::layout::LayoutError;

/// Errors produced by the library layer, wrapping portal client errors and
/// adding markup, session and input failures.
#[derive(Debug)]
pub enum HkexNewsError {
    /// Transport failure, non-success status, or an invalid query from the API crate.
    Api(hkexnews_api::Error),
    /// The response could not be read as markup at all.
    Parse(String),
    /// The rendered form lacked the view-state tokens needed for the next POST.
    MissingSessionState(String),
    /// The portal layout table could not be loaded.
    Layout(LayoutError),
    /// User-provided input failed validation.
    InvalidInput(String),
    /// The crawl was cancelled before it finished.
    Cancelled,
}

impl fmt::Display for HkexNewsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::Parse(msg) => write!(f, "Parse error: {}", msg),
            Self::MissingSessionState(msg) => write!(f, "Missing session state: {}", msg),
            Self::Layout(e) => write!(f, "Layout error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl std::error::Error for HkexNewsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Layout(e) => Some(e),
            _ => None,
        }
    }
}

impl From<hkexnews_api::Error> for HkexNewsError {
    fn from(e: hkexnews_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<LayoutError> for HkexNewsError {
    fn from(e: LayoutError) -> Self {
        Self::Layout(e)
    }
}
