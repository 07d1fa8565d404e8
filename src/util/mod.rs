//! Utility functions shared by the fetcher and the command-line entry point.
//!
//! - **Source validation**: only `http`/`https` URLs are fetched

mod source;

pub use source::{validate_source, UrlValidationError};
