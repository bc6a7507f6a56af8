use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use url::Url;

use super::timestamp::{parse_pub_date, to_local_minute};
use crate::{
    common::{Fetch, QueryResult},
    config::NaverCredentials,
    ArticleRecord, NaverItem, NaverResponse, ProviderError, TimestampError,
};

const API_BASE_URL: &str = "https://openapi.naver.com";
const SEARCH_PATH: &str = "/v1/search/news.json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct NaverFetcher {
    client: reqwest::Client,
    credentials: NaverCredentials,
    endpoint: Url,
}

impl NaverFetcher {
    /// Create a fetcher against the public search API
    pub fn new(credentials: &NaverCredentials) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            credentials: credentials.clone(),
            endpoint: endpoint(API_BASE_URL)?,
        })
    }

    /// Point the fetcher at another host, e.g. a mock server
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ProviderError> {
        self.endpoint = endpoint(base_url)?;
        Ok(self)
    }

    /// Run a single search request and decode the raw response
    async fn search(&self, query: &str) -> Result<NaverResponse, ProviderError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("query", query);

        let response = self
            .client
            .get(url)
            .header("X-Naver-Client-Id", &self.credentials.client_id)
            .header("X-Naver-Client-Secret", &self.credentials.client_secret)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl Fetch for NaverFetcher {
    async fn fetch(&self, query: &str, window_hours: i64) -> Result<QueryResult, ProviderError> {
        let response = self.search(query).await?;
        Ok(normalize_items(response.items, window_hours, Utc::now()))
    }
}

fn endpoint(base_url: &str) -> Result<Url, ProviderError> {
    let base = Url::parse(base_url)?;
    Ok(base.join(SEARCH_PATH)?)
}

/// Turn raw search hits into article records captured at `now`.
///
/// Items with an unreadable date end up in `rejected`; items published more
/// than `window_hours` before `now` and items left without a title after
/// cleaning are dropped.
#[must_use]
pub fn normalize_items(
    items: Vec<NaverItem>,
    window_hours: i64,
    now: DateTime<Utc>,
) -> QueryResult {
    // a window reaching past the representable range cuts nothing
    let cutoff = TimeDelta::try_hours(window_hours).and_then(|w| now.checked_sub_signed(w));
    let mut result = QueryResult::default();

    for item in items {
        let title = clean_markup(&item.title);
        if title.is_empty() {
            continue;
        }

        let Some(published) = parse_pub_date(&item.pub_date) else {
            result.rejected.push(TimestampError {
                title,
                raw: item.pub_date,
            });
            continue;
        };
        if cutoff.is_some_and(|cutoff| published.with_timezone(&Utc) < cutoff) {
            continue;
        }

        let link = if item.originallink.is_empty() {
            item.link
        } else {
            item.originallink
        };

        result.records.push(ArticleRecord::new(
            title,
            link,
            clean_markup(&item.description),
            to_local_minute(&published),
            now.timestamp(),
        ));
    }

    result
}

/// Strip the search term emphasis the provider wraps around matches. Any other
/// markup is left alone.
#[must_use]
pub fn clean_markup(text: &str) -> String {
    text.replace("<b>", "").replace("</b>", "")
}
