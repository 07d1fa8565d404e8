//! Output rendering for a parsed [`Feed`].
//!
//! Both renderers return a list of output entries that the caller joins with
//! `\n`. The text renderer embeds its blank separator lines inside the
//! entries, so an entry may span several lines.

use crate::feed::{Feed, FeedItem};

const CATEGORY_SEPARATOR: &str = ", ";

/// Renders the feed as a single pretty-printed JSON document.
///
/// Keys follow the declaration order of the model types; absent optional
/// fields and an empty item list are omitted. Non-ASCII text is written as
/// is, not escaped.
///
/// # Errors
///
/// Only fails if `serde_json` fails to serialize plain strings, which does
/// not happen for a [`Feed`].
pub fn render_json(feed: &Feed) -> serde_json::Result<Vec<String>> {
    Ok(vec![serde_json::to_string_pretty(feed)?])
}

/// Renders the feed as human-readable text.
///
/// Layout:
///
/// ```text
/// Feed: <title>
/// Link: <link>
/// Last Build Date / Publish Date / Language / Categories / Editor / Description
/// <blank>
///
/// Title: ...
/// Author / Published / Link / Categories
///
/// <description>
/// ```
pub fn render_text(feed: &Feed) -> Vec<String> {
    let meta = &feed.metadata;

    let mut output = vec![format!("Feed: {}", meta.title), format!("Link: {}", meta.link)];
    push_line(&mut output, "Last Build Date", meta.last_build_date.as_deref());
    push_line(&mut output, "Publish Date", meta.pub_date.as_deref());
    push_line(&mut output, "Language", meta.language.as_deref());
    push_categories(&mut output, &meta.categories);
    push_line(&mut output, "Editor", meta.managing_editor.as_deref());
    push_line(&mut output, "Description", meta.description.as_deref());

    // Always separates the channel header from the items
    output.push(String::new());

    output.extend(feed.items.iter().filter_map(render_item));
    output
}

/// Renders one item block, or `None` if the item has nothing to show.
fn render_item(item: &FeedItem) -> Option<String> {
    let mut lines = Vec::new();

    if let Some(title) = &item.title {
        lines.push(format!("\nTitle: {title}"));
    }
    push_line(&mut lines, "Author", item.author.as_deref());
    push_line(&mut lines, "Published", item.pub_date.as_deref());
    push_line(&mut lines, "Link", item.link.as_deref());
    push_categories(&mut lines, &item.categories);
    if let Some(description) = &item.description {
        lines.push(format!("\n{description}"));
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn push_line(lines: &mut Vec<String>, label: &str, value: Option<&str>) {
    if let Some(value) = value {
        lines.push(format!("{label}: {value}"));
    }
}

fn push_categories(lines: &mut Vec<String>, categories: &[String]) {
    if !categories.is_empty() {
        lines.push(format!(
            "Categories: {}",
            categories.join(CATEGORY_SEPARATOR)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::FeedMetadata;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn minimal_feed() -> Feed {
        Feed {
            metadata: FeedMetadata {
                title: "T".to_string(),
                link: "L".to_string(),
                ..FeedMetadata::default()
            },
            items: Vec::new(),
        }
    }

    fn full_feed() -> Feed {
        Feed {
            metadata: FeedMetadata {
                title: "Example".to_string(),
                link: "https://example.com".to_string(),
                last_build_date: Some("Tue, 07 Sep 2021".to_string()),
                pub_date: Some("Mon, 06 Sep 2021".to_string()),
                language: Some("en".to_string()),
                categories: vec!["News".to_string(), "Tech".to_string(), "News".to_string()],
                managing_editor: Some("ed@example.com".to_string()),
                description: Some("Everything".to_string()),
            },
            items: vec![
                FeedItem {
                    title: Some("One".to_string()),
                    author: Some("amy".to_string()),
                    pub_date: Some("Mon, 06 Sep 2021".to_string()),
                    link: Some("https://example.com/1".to_string()),
                    categories: vec!["Tech".to_string(), "Rust".to_string()],
                    description: Some("First body".to_string()),
                },
                FeedItem {
                    link: Some("https://example.com/2".to_string()),
                    ..FeedItem::default()
                },
            ],
        }
    }

    #[test]
    fn test_text_minimal_feed() {
        assert_eq!(render_text(&minimal_feed()), vec!["Feed: T", "Link: L", ""]);
        assert_eq!(render_text(&minimal_feed()).join("\n"), "Feed: T\nLink: L\n");
    }

    #[test]
    fn test_text_full_feed() {
        let expected = "\
Feed: Example
Link: https://example.com
Last Build Date: Tue, 07 Sep 2021
Publish Date: Mon, 06 Sep 2021
Language: en
Categories: News, Tech, News
Editor: ed@example.com
Description: Everything


Title: One
Author: amy
Published: Mon, 06 Sep 2021
Link: https://example.com/1
Categories: Tech, Rust

First body
Link: https://example.com/2";

        assert_eq!(render_text(&full_feed()).join("\n"), expected);
    }

    #[test]
    fn test_text_item_without_title_has_no_leading_blank() {
        let mut feed = minimal_feed();
        feed.items.push(FeedItem {
            author: Some("bob".to_string()),
            description: Some("Body".to_string()),
            ..FeedItem::default()
        });
        assert_eq!(
            render_text(&feed),
            vec!["Feed: T", "Link: L", "", "Author: bob\n\nBody"]
        );
    }

    #[test]
    fn test_text_skips_empty_item() {
        let mut feed = minimal_feed();
        feed.items.push(FeedItem::default());
        assert_eq!(render_text(&feed), vec!["Feed: T", "Link: L", ""]);
    }

    #[test]
    fn test_json_skips_empty_item() {
        let mut feed = minimal_feed();
        feed.items.push(FeedItem::default());
        assert_eq!(
            render_json(&feed).unwrap(),
            render_json(&minimal_feed()).unwrap()
        );
    }

    #[test]
    fn test_json_minimal_feed() {
        let output = render_json(&minimal_feed()).unwrap();
        assert_eq!(output.len(), 1);
        assert_eq!(output[0], "{\n  \"title\": \"T\",\n  \"link\": \"L\"\n}");
    }

    #[test]
    fn test_json_key_order() {
        let output = render_json(&full_feed()).unwrap();
        let json = &output[0];

        let keys = [
            "\"title\"",
            "\"link\"",
            "\"lastBuildDate\"",
            "\"pubDate\"",
            "\"language\"",
            "\"category\"",
            "\"managingEditor\"",
            "\"description\"",
            "\"items\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
    }

    #[test]
    fn test_json_item_shape() {
        let output = render_json(&full_feed()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output[0]).unwrap();

        assert_eq!(value["title"], "Example");
        assert_eq!(value["category"], serde_json::json!(["News", "Tech", "News"]));

        let items = value["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["pubDate"], "Mon, 06 Sep 2021");
        assert_eq!(items[0]["category"], serde_json::json!(["Tech", "Rust"]));
        assert_eq!(
            items[1],
            serde_json::json!({ "link": "https://example.com/2" })
        );
    }

    #[test]
    fn test_json_omits_absent_fields() {
        let output = render_json(&minimal_feed()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output[0]).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 2);
        assert!(!object.contains_key("items"));
        assert!(!object.contains_key("category"));
        assert!(!object.contains_key("description"));
    }

    #[test]
    fn test_json_keeps_non_ascii_unescaped() {
        let mut feed = minimal_feed();
        feed.metadata.title = "Café 日本".to_string();
        let output = render_json(&feed).unwrap();
        assert!(output[0].contains("\"title\": \"Café 日本\""));
    }

    fn arb_text() -> impl Strategy<Value = Option<String>> {
        proptest::option::of("[a-zA-Z0-9 ]{1,12}")
    }

    fn arb_item() -> impl Strategy<Value = FeedItem> {
        (
            arb_text(),
            arb_text(),
            arb_text(),
            proptest::collection::vec("[a-z]{1,6}", 0..3),
        )
            .prop_map(|(title, author, link, categories)| FeedItem {
                title,
                author,
                link,
                categories,
                ..FeedItem::default()
            })
    }

    proptest! {
        #[test]
        fn prop_rendering_is_deterministic(items in proptest::collection::vec(arb_item(), 0..6)) {
            let mut feed = minimal_feed();
            feed.items = items;

            prop_assert_eq!(render_text(&feed), render_text(&feed));
            prop_assert_eq!(render_json(&feed).unwrap(), render_json(&feed).unwrap());
        }

        #[test]
        fn prop_text_blocks_match_json_items(items in proptest::collection::vec(arb_item(), 0..6)) {
            let mut feed = minimal_feed();
            feed.items = items.into_iter().filter(|item| !item.is_empty()).collect();

            prop_assert_eq!(render_text(&feed).len(), 3 + feed.items.len());

            let value: serde_json::Value =
                serde_json::from_str(&render_json(&feed).unwrap()[0]).unwrap();
            let json_items = value.get("items").and_then(|v| v.as_array()).map_or(0, Vec::len);
            prop_assert_eq!(json_items, feed.items.len());
        }
    }
}
