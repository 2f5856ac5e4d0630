use crate::types::SessionState;

use super::{
    common::{FormPayload, FormQuery},
    fields,
};

/// Click on the pager's "next" image button.
///
/// Carries only the two continuity tokens and the click coordinates; the
/// portal remembers the search criteria inside the view state.
#[derive(Debug, Clone, Copy, Default)]
pub struct NextPageQuery;

impl FormQuery for NextPageQuery {
    fn to_form(&self, session: &SessionState) -> FormPayload {
        let (x, y) = fields::NEXT_BUTTON_CLICK;
        let mut form = FormPayload::new();
        form.echo(session, &[fields::VIEWSTATE, fields::VIEWSTATE_GENERATOR])
            .set(fields::VIEWSTATE_ENCRYPTED, "")
            .set(&format!("{}.x", fields::NEXT_BUTTON), x.to_string())
            .set(&format!("{}.y", fields::NEXT_BUTTON), y.to_string());
        form
    }
}
