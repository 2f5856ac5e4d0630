//! Small helpers over `scraper` shared by the page parsers.

use scraper::{ElementRef, Html, Node};

use crate::error::HkexNewsError;

/// Parse a response body. A body with no markup at all is the only input
/// treated as unparseable; html5ever recovers from everything else.
pub(crate) fn parse_document(body: &str) -> Result<Html, HkexNewsError> {
    if body.trim().is_empty() {
        return Err(HkexNewsError::Parse("empty response body".into()));
    }
    Ok(Html::parse_document(body))
}

/// Element children of `element` named `name`, in document order.
pub(crate) fn child_elements<'a>(
    element: ElementRef<'a>,
    name: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| child.value().name() == name)
}

/// First descendant of `element` (excluding itself) named `name`.
pub(crate) fn first_descendant<'a>(element: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == name)
}

/// Text content with every `<br>` replaced by `separator`.
pub(crate) fn text_with_breaks(element: ElementRef<'_>, separator: &str) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if el.name() == "br" => out.push_str(separator),
            _ => {}
        }
    }
    out
}

/// Concatenated text content of `element`.
pub(crate) fn text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Trim and collapse internal whitespace runs to one space.
pub(crate) fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop every whitespace character.
pub(crate) fn strip_whitespace(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}
