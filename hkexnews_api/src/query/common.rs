//! Shared form infrastructure: the [`FormQuery`] trait and the ordered [`FormPayload`].

use crate::types::SessionState;

/// Trait implemented by all form builders. Turns a builder plus the session
/// state of the previously rendered form into a POST body.
pub trait FormQuery {
    /// Builds the form payload. Pure; nothing is sent.
    fn to_form(&self, session: &SessionState) -> FormPayload;
}

/// Ordered `application/x-www-form-urlencoded` body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    pairs: Vec<(String, String)>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name`, replacing an earlier value in place.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        match self.pairs.iter_mut().find(|(n, _)| n == name) {
            Some(existing) => existing.1 = value,
            None => self.pairs.push((name.to_string(), value)),
        }
        self
    }

    /// Copies `names` from the session verbatim; absent names are sent empty.
    pub fn echo(&mut self, session: &SessionState, names: &[&str]) -> &mut Self {
        for name in names {
            self.set(name, session.value_or_empty(name));
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_keeps_first_position() {
        let mut payload = FormPayload::new();
        payload.set("a", "1").set("b", "2").set("a", "3");
        assert_eq!(
            payload.as_pairs(),
            &[("a".to_string(), "3".to_string()), ("b".to_string(), "2".to_string())]
        );
    }

    #[test]
    fn echo_fills_missing_with_empty() {
        let session: SessionState = [("x", "1")].into_iter().collect();
        let mut payload = FormPayload::new();
        payload.echo(&session, &["x", "y"]);
        assert_eq!(payload.get("x"), Some("1"));
        assert_eq!(payload.get("y"), Some(""));
    }
}
