use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::{
    common::{diff, Fetch},
    config::NewsConfig,
    news::prelude::aggregate,
    sender::{format_article, Notify},
    storage::{FileStorage, Storage},
};

pub const ANNOUNCE_HEADER: &str = "Search queries:";

/// What a single poll cycle did
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Records that survived fetching and normalization
    pub fetched: usize,
    /// Records notified as new
    pub new: usize,
    /// Records kept in the history file after this cycle
    pub retained: usize,
    pub failed_queries: usize,
    pub rejected: usize,
    pub saved: bool,
}

pub struct Controller<F, N> {
    fetcher: F,
    sender: N,
    storage: Storage,
    news: NewsConfig,
}

impl<F: Fetch, N: Notify> Controller<F, N> {
    #[must_use]
    pub fn new(fetcher: F, sender: N, storage: Storage, news: &NewsConfig) -> Self {
        Self {
            fetcher,
            sender,
            storage,
            news: news.clone(),
        }
    }

    /// Tell the chats which queries are being watched
    pub async fn announce(&self) {
        self.sender.send_message(ANNOUNCE_HEADER).await;
        for query in &self.news.query_list {
            self.sender.send_message(query).await;
        }
    }

    /// Run one poll cycle: load the history, search, notify what wasn't seen
    /// before and persist the updated history. Nothing in here is fatal.
    pub async fn run_cycle(&self) -> CycleReport {
        let mut history = match self.storage.load() {
            Ok(history) => history,
            Err(e) => {
                warn!(error = %e, "could not load history, starting from scratch");
                Vec::new()
            }
        };

        let aggregate = aggregate(
            &self.fetcher,
            &self.news.query_list,
            self.news.time_window_hours,
        )
        .await;

        for (query, e) in &aggregate.failures {
            warn!(query = %query, error = %e, "news search failed");
        }
        for e in &aggregate.rejected {
            warn!(title = %e.title, raw = %e.raw, "skipping article with unparsable date");
        }
        if let Some((_, e)) = aggregate.cycle_error() {
            let message = format!("News search failed: {e}");
            error!("{message}");
            self.sender.send_message(&message).await;
        }

        let fresh = diff(&history, &aggregate.records);
        info!(count = fresh.len(), "new articles found");

        for record in &fresh {
            self.sender.send_message(&format_article(record)).await;
        }

        let mut report = CycleReport {
            fetched: aggregate.records.len(),
            new: fresh.len(),
            failed_queries: aggregate.failures.len(),
            rejected: aggregate.rejected.len(),
            ..CycleReport::default()
        };

        history.extend(fresh);
        report.retained = history.len();
        report.saved = match self.storage.save(&history) {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "could not save history");
                false
            }
        };

        info!(
            last_refresh = chrono::Utc::now().timestamp(),
            fetched = report.fetched,
            new = report.new,
            failed_queries = report.failed_queries,
            rejected = report.rejected,
            history = report.retained,
            saved = report.saved,
            "cycle finished"
        );
        report
    }

    /// Announce the queries, then poll until `shutdown` turns true or its
    /// sender goes away. A running cycle always completes; only the pause
    /// between cycles is cut short.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let interval = Duration::from_secs(self.news.pull_interval_seconds);
        self.announce().await;

        while !*shutdown.borrow() {
            self.run_cycle().await;

            tokio::select! {
                () = tokio::time::sleep(interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!("polling stopped");
    }
}
