//! Decoded feed documents.
//!
//! Fields mirror the RSS 2.0 wire format; absent elements decode to empty
//! strings and are interpreted later by the normalizer.

use crate::{AggregatorError, Result};

/// A decoded feed document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedDocument {
    /// The document's channel.
    pub channel: Channel,
}

/// The `<channel>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Channel {
    /// Channel title.
    pub title: String,
    /// Channel website link.
    pub link: String,
    /// Channel description.
    pub description: String,
    /// Items in document order.
    pub items: Vec<RawItem>,
}

/// An `<item>` element as it appeared on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawItem {
    /// Item title.
    pub title: String,
    /// Item URL.
    pub link: String,
    /// Item description.
    pub description: String,
    /// Publish date string, expected in RFC 1123 numeric-zone form.
    pub pub_date: String,
}

impl From<&rss::Item> for RawItem {
    fn from(item: &rss::Item) -> Self {
        RawItem {
            title: item.title().unwrap_or_default().to_string(),
            link: item.link().unwrap_or_default().to_string(),
            description: item.description().unwrap_or_default().to_string(),
            pub_date: item.pub_date().unwrap_or_default().to_string(),
        }
    }
}

impl From<rss::Channel> for FeedDocument {
    fn from(channel: rss::Channel) -> Self {
        FeedDocument {
            channel: Channel {
                title: channel.title().to_string(),
                link: channel.link().to_string(),
                description: channel.description().to_string(),
                items: channel.items().iter().map(RawItem::from).collect(),
            },
        }
    }
}

/// Decode an RSS 2.0 document.
pub fn parse_document(bytes: &[u8]) -> Result<FeedDocument> {
    let channel = rss::Channel::read_from(bytes)
        .map_err(|e| AggregatorError::Fetch(format!("failed to parse feed: {}", e)))?;
    Ok(channel.into())
}
