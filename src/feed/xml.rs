use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

/// Maximum allowed element nesting depth.
/// Prevents unbounded stack growth from maliciously crafted deeply nested documents.
const MAX_XML_DEPTH: usize = 256;

/// Errors that make a document not well-formed.
#[derive(Debug, Error)]
pub enum XmlError {
    /// Lexical or structural error reported by the XML reader.
    #[error("{message} at byte {position}")]
    Syntax { position: u64, message: String },

    /// An element was still open when the input ended.
    #[error("unclosed element <{0}> at end of document")]
    UnclosedElement(String),

    /// The input contained no element at all.
    #[error("no root element found")]
    MissingRoot,

    /// A second top-level element followed the root.
    #[error("junk after document element: <{0}>")]
    MultipleRoots(String),

    /// Non-whitespace character data outside the root element.
    #[error("text outside of the root element")]
    TextOutsideRoot,

    /// Nesting depth exceeds the safety limit.
    #[error("nesting depth exceeds maximum of {0} levels")]
    MaxDepthExceeded(usize),
}

/// One element of a parsed XML document.
///
/// `text` holds only the character data that appears before the first child
/// element, which is where RSS puts the values we read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Qualified tag name, e.g. `channel` or `dc:creator`.
    pub name: String,
    /// Character data before the first child, entities resolved, untrimmed.
    pub text: String,
    /// Child elements in document order.
    pub children: Vec<Element>,
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// Returns the first direct child with the given tag name.
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == tag)
    }

    /// Returns every direct child with the given tag name, in document order.
    pub fn find_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == tag)
    }

    fn push_text(&mut self, text: &str) {
        if self.children.is_empty() {
            self.text.push_str(text);
        }
    }
}

/// Parses a complete XML document into its root [`Element`].
///
/// Comments, processing instructions, the XML declaration and DOCTYPE are
/// skipped. CDATA sections contribute to element text like ordinary
/// character data.
///
/// # Errors
///
/// Returns [`XmlError`] if the document is not well-formed: mismatched or
/// unmatched end tags, elements left open, no root or several roots, text
/// outside the root, unknown entity references, or nesting deeper than the
/// safety limit.
///
/// # Security
///
/// `quick-xml` (0.37) never parses `<!ENTITY>` declarations. Only the five
/// predefined entities and character references are resolved; anything else
/// (including `&xxe;`) fails to unescape and is reported as a syntax error.
pub fn parse_document(content: &str) -> Result<Element, XmlError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut buf = Vec::new();

    let syntax_error = |reader: &Reader<&[u8]>, e: quick_xml::Error| XmlError::Syntax {
        position: reader.error_position() as u64,
        message: e.to_string(),
    };

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let element = start_element(&e, &reader)?;
                if stack.is_empty() && root.is_some() {
                    return Err(XmlError::MultipleRoots(element.name));
                }
                if stack.len() >= MAX_XML_DEPTH {
                    return Err(XmlError::MaxDepthExceeded(MAX_XML_DEPTH));
                }
                stack.push(element);
            }
            Ok(Event::Empty(e)) => {
                let element = start_element(&e, &reader)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                // quick-xml already rejects unmatched and mismatched end names
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element)?;
                }
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|err| syntax_error(&reader, err))?;
                match stack.last_mut() {
                    Some(current) => current.push_text(&text),
                    None if text.trim().is_empty() => {}
                    None => return Err(XmlError::TextOutsideRoot),
                }
            }
            Ok(Event::CData(e)) => match stack.last_mut() {
                Some(current) => current.push_text(&String::from_utf8_lossy(&e)),
                None => return Err(XmlError::TextOutsideRoot),
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(syntax_error(&reader, e)),
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::UnclosedElement(open.name));
    }
    root.ok_or(XmlError::MissingRoot)
}

/// Validates a start tag and returns the empty element it opens.
///
/// Attribute values are not kept, but they must still be well-formed:
/// quoted, not repeated, free of `<` and with only known references.
fn start_element(e: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<Element, XmlError> {
    let invalid = |message: String| XmlError::Syntax {
        position: reader.buffer_position() as u64,
        message,
    };

    let name = e.name();
    if !is_valid_name(name.as_ref()) {
        return Err(invalid(format!(
            "invalid element name '{}'",
            String::from_utf8_lossy(name.as_ref())
        )));
    }

    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|err| invalid(err.to_string()))?;
        let key = attr.key.as_ref();
        if !is_valid_name(key) {
            return Err(invalid(format!(
                "invalid attribute name '{}'",
                String::from_utf8_lossy(key)
            )));
        }
        if attr.value.contains(&b'<') {
            return Err(invalid(format!(
                "'<' in value of attribute '{}'",
                String::from_utf8_lossy(key)
            )));
        }
        attr.unescape_value().map_err(|err| invalid(err.to_string()))?;
    }

    Ok(Element::new(String::from_utf8_lossy(name.as_ref()).into_owned()))
}

/// XML `Name` production, relaxed to accept any non-ASCII character.
fn is_valid_name(name: &[u8]) -> bool {
    let is_start = |b: u8| b.is_ascii_alphabetic() || b == b'_' || b == b':' || !b.is_ascii();
    match name.split_first() {
        Some((&first, rest)) => {
            is_start(first)
                && rest
                    .iter()
                    .all(|&b| is_start(b) || b.is_ascii_digit() || b == b'-' || b == b'.')
        }
        None => false,
    }
}

/// Attaches a finished element to its parent, or installs it as the root.
fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_some() => return Err(XmlError::MultipleRoots(element.name)),
        None => *root = Some(element),
    }
    Ok(())
}
