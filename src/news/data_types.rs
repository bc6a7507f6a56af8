use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::timestamp::parse_display;

/// Search response as returned by the news endpoint
#[allow(dead_code)]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NaverResponse {
    pub last_build_date: String,
    pub total: i64,
    pub start: i64,
    pub display: i64,
    pub items: Vec<NaverItem>,
}

/// A single raw search hit: title and description carry `<b>` emphasis,
/// `originallink` may be empty
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NaverItem {
    pub title: String,
    pub originallink: String,
    pub link: String,
    pub description: String,
    #[serde(rename = "pubDate")]
    pub pub_date: String,
}

/// A normalized news item. This is both what gets notified and what gets
/// persisted in the history file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    pub title: String,
    pub link: String,
    pub description: String,
    /// Local time, `YYYY/MM/DD HH:MM`
    pub published_at: String,
    /// Unix seconds at which the record was captured
    pub seen_at: i64,
    #[serde(skip)]
    published: Option<NaiveDateTime>,
}

impl ArticleRecord {
    #[must_use]
    pub fn new(
        title: String,
        link: String,
        description: String,
        published: NaiveDateTime,
        seen_at: i64,
    ) -> Self {
        Self {
            published_at: super::timestamp::format_display(&published),
            title,
            link,
            description,
            seen_at,
            published: Some(published),
        }
    }

    /// Minute-precision local publish time used for ordering. Records read
    /// back from disk don't carry it, so it is recovered from `published_at`.
    #[must_use]
    pub fn published(&self) -> Option<NaiveDateTime> {
        self.published.or_else(|| parse_display(&self.published_at))
    }
}

impl PartialEq for ArticleRecord {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
            && self.link == other.link
            && self.description == other.description
            && self.published_at == other.published_at
            && self.seen_at == other.seen_at
    }
}

impl Eq for ArticleRecord {}
