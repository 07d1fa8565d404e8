use thiserror::Error;

use super::model::{Feed, FeedItem, FeedMetadata};
use super::text::extract_text;
use super::xml::{parse_document, Element, XmlError};

/// Errors that can occur while turning a response body into a [`Feed`].
#[derive(Debug, Error)]
pub enum ParseError {
    /// The body was empty or whitespace only.
    #[error("Received empty XML response. Please check the URL.")]
    EmptyResponse,

    /// The body is not well-formed XML.
    #[error("Failed to parse XML: {0}")]
    MalformedXml(#[from] XmlError),

    /// The root element has no `<channel>` child.
    #[error("Invalid RSS feed: Missing <channel> tag")]
    MissingChannel,
}

/// Builds a [`Feed`] from RSS XML text.
///
/// Empty fields are elided, items with no fields at all are dropped, and
/// then the remaining items are truncated to `limit`. A limit of `None` or
/// `Some(0)` keeps every item.
///
/// # Errors
///
/// - [`ParseError::EmptyResponse`] if `xml` is blank
/// - [`ParseError::MalformedXml`] if `xml` is not well-formed
/// - [`ParseError::MissingChannel`] if the root has no `<channel>` child
pub fn build_feed(xml: &str, limit: Option<usize>) -> Result<Feed, ParseError> {
    if xml.trim().is_empty() {
        return Err(ParseError::EmptyResponse);
    }

    let root = parse_document(xml)?;
    let channel = root.find("channel").ok_or(ParseError::MissingChannel)?;

    let metadata = FeedMetadata {
        title: extract_text(channel.find("title")),
        link: extract_text(channel.find("link")),
        last_build_date: field(channel, "lastBuildDate"),
        pub_date: field(channel, "pubDate"),
        language: field(channel, "language"),
        categories: categories(channel),
        managing_editor: field(channel, "managingEditor"),
        description: field(channel, "description"),
    };

    let items = channel
        .find_all("item")
        .map(build_item)
        .filter(|item| !item.is_empty());

    let items = match limit {
        Some(n) if n > 0 => items.take(n).collect(),
        _ => items.collect(),
    };

    Ok(Feed { metadata, items })
}

fn build_item(item: &Element) -> FeedItem {
    FeedItem {
        title: field(item, "title"),
        author: field(item, "author"),
        pub_date: field(item, "pubDate"),
        link: field(item, "link"),
        categories: categories(item),
        description: field(item, "description"),
    }
}

/// Text of the first `tag` child, `None` when missing or blank.
fn field(parent: &Element, tag: &str) -> Option<String> {
    let text = extract_text(parent.find(tag));
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn categories(parent: &Element) -> Vec<String> {
    parent
        .find_all("category")
        .map(|category| extract_text(Some(category)))
        .collect()
}
