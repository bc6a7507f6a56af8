use std::collections::HashSet;

use crate::{ArticleRecord, ProviderError, TimestampError};

/// Records produced for one query, along with the ones dropped because their
/// publish date could not be read
#[derive(Debug, Default)]
pub struct QueryResult {
    pub records: Vec<ArticleRecord>,
    pub rejected: Vec<TimestampError>,
}

pub trait Fetch {
    /// Search for `query` and return normalized records published within the
    /// last `window_hours`.
    async fn fetch(&self, query: &str, window_hours: i64) -> Result<QueryResult, ProviderError>;
}

/// Return the fetched records whose title has not been seen in the history.
/// The title is compared verbatim and is the only identity key; order of
/// `fetched` is kept. Duplicates inside `fetched` itself are not collapsed.
#[must_use]
pub fn diff(history: &[ArticleRecord], fetched: &[ArticleRecord]) -> Vec<ArticleRecord> {
    let seen: HashSet<&str> = history.iter().map(|r| r.title.as_str()).collect();

    fetched
        .iter()
        .filter(|r| !seen.contains(r.title.as_str()))
        .cloned()
        .collect()
}
