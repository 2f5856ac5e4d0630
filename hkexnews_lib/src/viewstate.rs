//! Extraction of the webforms session state from a rendered page.
//!
//! ASP.NET webforms rejects a postback unless it echoes the `__VIEWSTATE`
//! blob and `__VIEWSTATEGENERATOR` tag rendered into the previous response.
//! The portal renders those (plus a few bookkeeping fields) as `<input>`
//! elements directly under the form; inputs nested inside the page's tables
//! belong to widgets and are ignored.

use hkexnews_api::types::SessionState;
use scraper::Html;
use tracing::{debug, warn};

use crate::error::HkexNewsError;
use crate::layout::{compile, PortalLayout};
use crate::markup::{child_elements, parse_document};

/// Parse `body` and extract the session state of its form.
///
/// Returns `Err(Parse)` only when the body is not markup at all. A page
/// without the form yields an empty state, which callers must treat as
/// "cannot continue" rather than "no more results".
pub fn extract_session_state(
    body: &str,
    layout: &PortalLayout,
) -> Result<SessionState, HkexNewsError> {
    let document = parse_document(body)?;
    session_state_from_document(&document, layout)
}

pub(crate) fn session_state_from_document(
    document: &Html,
    layout: &PortalLayout,
) -> Result<SessionState, HkexNewsError> {
    let form_sel = compile(&layout.search.form)?;
    let Some(form) = document.select(&form_sel).next() else {
        warn!("No form found in response");
        return Ok(SessionState::new());
    };

    let mut state = SessionState::new();
    for input in child_elements(form, "input") {
        let name = input.value().attr("name").unwrap_or_default();
        let value = input.value().attr("value").unwrap_or_default();
        state.insert(name, value);
    }

    debug!(
        fields = state.len(),
        has_tokens = state.has_continuity_tokens(),
        "extracted session state"
    );
    Ok(state)
}
