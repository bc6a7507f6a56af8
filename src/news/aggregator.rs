use futures::future::join_all;

use crate::{common::Fetch, ArticleRecord, ProviderError, TimestampError};

/// Everything one pass over the configured queries produced
#[derive(Debug, Default)]
pub struct Aggregate {
    /// Records from all queries, oldest first
    pub records: Vec<ArticleRecord>,
    pub rejected: Vec<TimestampError>,
    /// Queries that contributed nothing because the request failed
    pub failures: Vec<(String, ProviderError)>,
    queries: usize,
}

impl Aggregate {
    /// The first failure, if every query failed. A partial failure is not a
    /// cycle-level error.
    #[must_use]
    pub fn cycle_error(&self) -> Option<&(String, ProviderError)> {
        if self.queries > 0 && self.failures.len() == self.queries {
            self.failures.first()
        } else {
            None
        }
    }
}

/// Run the fetcher for every query and merge the results.
///
/// Requests run concurrently, but results are merged in query order before
/// sorting, so the output doesn't depend on which request finishes first. The
/// same article matched by two queries shows up twice.
pub async fn aggregate<F: Fetch>(fetcher: &F, queries: &[String], window_hours: i64) -> Aggregate {
    let results = join_all(
        queries
            .iter()
            .map(|query| fetcher.fetch(query, window_hours)),
    )
    .await;

    let mut aggregate = Aggregate {
        queries: queries.len(),
        ..Aggregate::default()
    };
    for (query, result) in queries.iter().zip(results) {
        match result {
            Ok(mut found) => {
                aggregate.records.append(&mut found.records);
                aggregate.rejected.append(&mut found.rejected);
            }
            Err(e) => aggregate.failures.push((query.clone(), e)),
        }
    }

    sort_by_published(&mut aggregate.records);
    aggregate
}

/// Stable ascending sort by publish minute. Records whose time can't be
/// recovered go last instead of failing the sort.
pub fn sort_by_published(records: &mut [ArticleRecord]) {
    records.sort_by_key(|r| {
        let published = r.published();
        (published.is_none(), published)
    });
}
