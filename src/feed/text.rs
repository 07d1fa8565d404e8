use super::xml::Element;

/// Returns the trimmed text of an element, or an empty string.
///
/// An absent element, an element without text and an element whose text is
/// only whitespace all yield `""`.
pub fn extract_text(element: Option<&Element>) -> String {
    element
        .map(|e| e.text.trim().to_string())
        .unwrap_or_default()
}
