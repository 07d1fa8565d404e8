use serde::{Serialize, Serializer};

/// Channel-level metadata of an RSS feed.
///
/// Field declaration order is the JSON key order. Optional fields are left
/// out of the JSON output when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedMetadata {
    pub title: String,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_build_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pub_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// `<category>` texts in document order, duplicates kept.
    #[serde(rename = "category", skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managing_editor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A single `<item>` of a channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pub_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(rename = "category", skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FeedItem {
    /// True when no field is present. Such items are never kept in a [`Feed`].
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.pub_date.is_none()
            && self.link.is_none()
            && self.categories.is_empty()
            && self.description.is_none()
    }
}

/// A parsed feed: channel metadata plus the retained items.
///
/// Serializes as one flat JSON object, metadata keys first, then `items`.
/// Empty items are never serialized, so a hand-built `Feed` renders the same
/// in both output formats as one produced by [`build_feed`](super::build_feed).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Feed {
    #[serde(flatten)]
    pub metadata: FeedMetadata,
    #[serde(
        skip_serializing_if = "no_visible_items",
        serialize_with = "serialize_visible_items"
    )]
    pub items: Vec<FeedItem>,
}

fn no_visible_items(items: &[FeedItem]) -> bool {
    items.iter().all(FeedItem::is_empty)
}

fn serialize_visible_items<S: Serializer>(
    items: &[FeedItem],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(items.iter().filter(|item| !item.is_empty()))
}
