/// Base64 view-state blob issued by the portal.
pub const VIEWSTATE: &str = "__VIEWSTATE";
/// Generator tag that must accompany [`VIEWSTATE`].
pub const VIEWSTATE_GENERATOR: &str = "__VIEWSTATEGENERATOR";

/// Name→value pairs of the inputs of one rendered search form.
///
/// A crawl owns exactly one of these at a time and replaces it after every
/// page fetch. Insertion order is kept; inserting an existing name replaces
/// its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    fields: Vec<(String, String)>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Value of `name`, or the empty string when the form did not carry it.
    pub fn value_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }

    /// True when both continuity tokens are present and the view state is non-empty.
    pub fn has_continuity_tokens(&self) -> bool {
        self.get(VIEWSTATE).is_some_and(|v| !v.is_empty())
            && self.get(VIEWSTATE_GENERATOR).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SessionState {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut state = SessionState::new();
        for (name, value) in iter {
            state.insert(name, value);
        }
        state
    }
}
