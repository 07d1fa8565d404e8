use thiserror::Error;
use url::Url;

/// Errors that can occur while validating a feed source URL.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
}

/// Validates a feed source URL before it is requested.
///
/// Only `http` and `https` URLs are accepted. Local and private
/// addresses are allowed: reading a feed from a local server is a normal use
/// of a command-line reader.
///
/// # Examples
///
/// ```
/// use rss_reader::util::validate_source;
///
/// let url = validate_source("https://example.com/feed.xml").unwrap();
/// assert_eq!(url.host_str(), Some("example.com"));
///
/// assert!(validate_source("file:///etc/passwd").is_err());
/// assert!(validate_source("not a url").is_err());
/// ```
pub fn validate_source(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert!(validate_source("https://example.com/feed.xml").is_ok());
        assert!(validate_source("http://news.example.org").is_ok());
        assert!(validate_source("https://example.com:8443/rss?lang=en").is_ok());
    }

    #[test]
    fn test_local_addresses_accepted() {
        assert!(validate_source("http://localhost:8080/feed").is_ok());
        assert!(validate_source("http://127.0.0.1:3000/rss").is_ok());
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        let url = validate_source("  https://example.com/feed \n").unwrap();
        assert_eq!(url.as_str(), "https://example.com/feed");
    }

    #[test]
    fn test_invalid_schemes() {
        assert!(matches!(
            validate_source("file:///etc/passwd"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            validate_source("ftp://example.com"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_unparseable_url() {
        assert!(matches!(
            validate_source("example.com/feed"),
            Err(UrlValidationError::InvalidUrl(_))
        ));
        assert!(validate_source("").is_err());
    }
}
