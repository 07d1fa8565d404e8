//! RSS feed fetching and parsing.
//!
//! - [`fetcher`] - HTTP retrieval with timeout, size limit and retry logic
//! - [`charset`] - Body decoding from the declared character encoding
//! - [`xml`] - Minimal owned XML document tree built on `quick-xml`
//! - [`parser`] - Turns the document tree into a [`Feed`] model
//!
//! # Example
//!
//! ```ignore
//! use rss_reader::feed::{build_feed, fetch_feed, FetchOptions};
//!
//! let body = fetch_feed(&client, "https://example.com/rss.xml", &FetchOptions::default()).await?;
//! let feed = build_feed(&body, Some(5))?;
//! ```

mod charset;
mod fetcher;
mod model;
mod parser;
mod text;
mod xml;

pub use fetcher::{fetch_feed, FetchError, FetchOptions};
pub use model::{Feed, FeedItem, FeedMetadata};
pub use parser::{build_feed, ParseError};
pub use text::extract_text;
pub use xml::{parse_document, Element, XmlError};
