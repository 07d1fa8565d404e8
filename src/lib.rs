//! Command-line RSS reader.
//!
//! Fetches one RSS feed over HTTP and prints its channel metadata and items
//! as plain text or JSON.
//!
//! ```text
//! fetch_feed → build_feed → render_text / render_json → stdout
//! ```
//!
//! - [`feed`]: HTTP fetching, XML document tree and the feed model builder
//! - [`render`]: text and JSON output
//! - [`config`]: optional TOML configuration
//! - [`util`]: source URL validation

pub mod config;
pub mod feed;
pub mod render;
pub mod util;
