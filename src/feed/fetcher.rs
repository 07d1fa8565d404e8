use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;

use super::charset::decode_body;
use crate::config::Config;
use crate::util::{validate_source, UrlValidationError};

/// Errors that can occur while downloading a feed.
///
/// These errors cover URL validation, network issues, HTTP errors and
/// response size problems. Parsing is handled separately by
/// [`build_feed`](super::build_feed).
#[derive(Debug, Error)]
pub enum FetchError {
    /// No source URL was given on the command line
    #[error("No RSS source URL provided")]
    MissingSource,
    /// The source URL failed validation
    #[error("Invalid source URL: {0}")]
    InvalidUrl(#[from] UrlValidationError),
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Server returned 429 Too Many Requests after max retries
    #[error("Rate limited after {0} retries")]
    RateLimited(u32),
    /// Response body exceeded the size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Response was incomplete (received fewer bytes than Content-Length)
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
}

/// Tuning knobs for [`fetch_feed`].
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Time allowed for one attempt, from sending the request to the last body byte.
    pub timeout: Duration,
    /// Retries for 429, 5xx and truncated responses.
    pub max_retries: u32,
    /// Maximum accepted body size in bytes.
    pub max_response_bytes: usize,
    /// First backoff delay; doubles after each retry.
    pub retry_base_delay: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            max_response_bytes: 10 * 1024 * 1024, // 10MB
            retry_base_delay: Duration::from_secs(1),
        }
    }
}

impl From<&Config> for FetchOptions {
    fn from(config: &Config) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_secs),
            max_retries: config.max_retries,
            max_response_bytes: config.max_response_bytes,
            ..Self::default()
        }
    }
}

/// Downloads a feed and returns its body as text.
///
/// # Arguments
///
/// * `client` - HTTP client (caller controls user agent and TLS setup)
/// * `url` - Feed URL, must be `http` or `https`
/// * `options` - Timeout, retry and size settings
///
/// # Behavior
///
/// - Rate limiting (HTTP 429) and server errors (5xx) trigger exponential
///   backoff with up to `max_retries` retries
/// - Other non-2xx statuses fail immediately
/// - Bodies shorter than their `Content-Length` are retried the same way
/// - Each attempt, body included, must finish within `options.timeout`
/// - The body is decoded from the charset in `Content-Type`, else the XML
///   declaration, else UTF-8
///
/// # Errors
///
/// - [`FetchError::InvalidUrl`] - URL did not parse or is not HTTP(S)
/// - [`FetchError::Network`] - Connection or TLS errors
/// - [`FetchError::Timeout`] - Request exceeded `options.timeout`
/// - [`FetchError::HttpStatus`] - Non-2xx HTTP response
/// - [`FetchError::RateLimited`] - 429 response after max retries
/// - [`FetchError::ResponseTooLarge`] - Body exceeded `options.max_response_bytes`
/// - [`FetchError::IncompleteResponse`] - Body still truncated after max retries
pub async fn fetch_feed(
    client: &reqwest::Client,
    url: &str,
    options: &FetchOptions,
) -> Result<String, FetchError> {
    let url = validate_source(url)?;
    let mut retry_count = 0;

    let (bytes, content_type) = loop {
        let deadline = tokio::time::Instant::now() + options.timeout;
        let response = tokio::time::timeout_at(deadline, client.get(url.clone()).send())
            .await
            .map_err(|_| FetchError::Timeout)?
            .map_err(FetchError::Network)?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            if retry_count >= options.max_retries {
                return Err(FetchError::RateLimited(options.max_retries));
            }

            let delay = backoff(options, retry_count);
            tracing::warn!(
                feed = %url,
                retry = retry_count,
                delay_ms = delay.as_millis() as u64,
                "Rate limited, backing off"
            );

            tokio::time::sleep(delay).await;
            retry_count += 1;
            continue;
        }

        if status.is_server_error() {
            if retry_count >= options.max_retries {
                return Err(FetchError::HttpStatus(status.as_u16()));
            }

            let delay = backoff(options, retry_count);
            tracing::warn!(
                feed = %url,
                status = %status,
                retry = retry_count,
                delay_ms = delay.as_millis() as u64,
                "Server error, retrying after delay"
            );

            tokio::time::sleep(delay).await;
            retry_count += 1;
            continue;
        }

        // 4xx errors fail immediately
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let body = tokio::time::timeout_at(
            deadline,
            read_limited_bytes(response, options.max_response_bytes),
        )
        .await
        .map_err(|_| FetchError::Timeout)?;

        match body {
            Ok(bytes) => break (bytes, content_type),
            Err(FetchError::IncompleteResponse { expected, received }) => {
                if retry_count >= options.max_retries {
                    return Err(FetchError::IncompleteResponse { expected, received });
                }

                let delay = backoff(options, retry_count);
                tracing::debug!(
                    feed = %url,
                    expected = expected,
                    received = received,
                    attempt = retry_count + 1,
                    "Retrying incomplete download"
                );

                tokio::time::sleep(delay).await;
                retry_count += 1;
                continue;
            }
            Err(e) => return Err(e),
        }
    };

    tracing::debug!(feed = %url, bytes = bytes.len(), "Feed downloaded");
    Ok(decode_body(&bytes, content_type.as_deref()))
}

/// Delay before retry number `retry_count` (zero-based): base, 2x base, 4x base, ...
fn backoff(options: &FetchOptions, retry_count: u32) -> Duration {
    options
        .retry_base_delay
        .saturating_mul(2u32.saturating_pow(retry_count))
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    let expected_length = response.content_length();

    // Fast path: check Content-Length header
    if let Some(len) = expected_length {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(FetchError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}
