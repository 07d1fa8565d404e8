use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use rss_reader::config::Config;
use rss_reader::feed::{build_feed, fetch_feed, FetchError, FetchOptions};
use rss_reader::render::{render_json, render_text};

#[derive(Parser, Debug)]
#[command(name = "rss_reader", about = "Command-line RSS reader", version)]
struct Args {
    /// RSS URL
    source: Option<String>,

    /// Print result as JSON in stdout
    #[arg(long)]
    json: bool,

    /// Limit news topics if this parameter provided
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Read settings from this file instead of ~/.config/rss-reader/config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path.cloned().or_else(Config::default_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config file: {}", path.display())),
        None => {
            tracing::debug!("HOME not set, using default configuration");
            Ok(Config::default())
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Diagnostics go to stderr so stdout stays clean for the rendered feed
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;

    let source = args.source.as_deref().ok_or(FetchError::MissingSource)?;
    let limit = args.limit.or(config.default_limit);

    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .build()
        .context("Failed to build HTTP client")?;

    let body = fetch_feed(&client, source, &FetchOptions::from(&config))
        .await
        .with_context(|| format!("Failed to fetch feed from {source}"))?;

    let feed = build_feed(&body, limit)?;
    tracing::debug!(
        title = %feed.metadata.title,
        items = feed.items.len(),
        "Feed parsed"
    );

    let output = if args.json {
        render_json(&feed).context("Failed to serialize feed as JSON")?
    } else {
        render_text(&feed)
    };

    println!("{}", output.join("\n"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["rss_reader", "https://example.com/rss"]).unwrap();
        assert_eq!(args.source.as_deref(), Some("https://example.com/rss"));
        assert!(!args.json);
        assert!(args.limit.is_none());
        assert!(args.config.is_none());
    }

    #[test]
    fn test_args_json_and_limit() {
        let args =
            Args::try_parse_from(["rss_reader", "https://example.com/rss", "--json", "--limit", "3"])
                .unwrap();
        assert!(args.json);
        assert_eq!(args.limit, Some(3));
    }

    #[test]
    fn test_args_source_is_optional() {
        let args = Args::try_parse_from(["rss_reader", "--json"]).unwrap();
        assert!(args.source.is_none());
    }

    #[test]
    fn test_args_negative_limit_rejected() {
        assert!(Args::try_parse_from(["rss_reader", "https://example.com/rss", "--limit", "-1"])
            .is_err());
    }

    #[test]
    fn test_args_non_numeric_limit_rejected() {
        assert!(Args::try_parse_from(["rss_reader", "--limit", "many"]).is_err());
    }
}
