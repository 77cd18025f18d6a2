//! Concurrent collection of items from every configured source.
//!
//! All sources are scraped at once and the aggregator waits for every one of
//! them to finish. A source that fails contributes nothing; it never cancels
//! or fails its siblings.

use crate::models::{NewsItem, SourceDescriptor, SourceGroup};
use crate::scrapers::{Fetch, scrape_source};
use chrono::{Days, NaiveDate};
use futures::future::join_all;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Fans source scraping out over a shared [`Fetch`] implementation.
#[derive(Debug)]
pub struct Aggregator<'a, F> {
    fetcher: &'a F,
    fetch_timeout: Duration,
}

impl<'a, F: Fetch> Aggregator<'a, F> {
    /// Borrow `fetcher`; every fetch is bounded by `fetch_timeout`.
    pub fn new(fetcher: &'a F, fetch_timeout: Duration) -> Self {
        Self {
            fetcher,
            fetch_timeout,
        }
    }

    /// Collect recent items from `sources`.
    ///
    /// Items keep their per-source order; the order between sources is not
    /// meaningful. Only items published on or after the day before `today`
    /// are returned.
    ///
    /// # Arguments
    ///
    /// * `sources` - Sources to scrape; cloud sites and expert blogs are
    ///   fetched as two concurrent groups
    /// * `today` - Reference date for the recency window
    ///
    /// # Returns
    ///
    /// The recent items of every source that could be fetched and parsed.
    /// A failing source contributes nothing; this never errors.
    #[instrument(level = "info", skip_all, fields(sources = sources.len(), %today))]
    pub async fn collect_all(&self, sources: &[SourceDescriptor], today: NaiveDate) -> Vec<NewsItem> {
        let (cloud, blogs): (Vec<&SourceDescriptor>, Vec<&SourceDescriptor>) = sources
            .iter()
            .partition(|s| s.group == SourceGroup::CloudWebsite);

        let (cloud_items, blog_items) =
            futures::join!(self.scrape_group(&cloud, today), self.scrape_group(&blogs, today));

        info!(
            cloud_sources = cloud.len(),
            cloud_items = cloud_items.len(),
            blog_sources = blogs.len(),
            blog_items = blog_items.len(),
            "Collected items from all sources"
        );

        let all: Vec<NewsItem> = cloud_items.into_iter().chain(blog_items).collect();
        let recent = filter_recent(all, today);
        info!(count = recent.len(), "Items inside the recency window");
        recent
    }

    async fn scrape_group(&self, sources: &[&SourceDescriptor], today: NaiveDate) -> Vec<NewsItem> {
        join_all(
            sources
                .iter()
                .map(|s| scrape_source(self.fetcher, s, self.fetch_timeout, today)),
        )
        .await
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Keep items dated on or after `today - 1 day`.
pub fn filter_recent(items: Vec<NewsItem>, today: NaiveDate) -> Vec<NewsItem> {
    let cutoff = today.checked_sub_days(Days::new(1)).unwrap_or(today);
    let before = items.len();
    let recent: Vec<NewsItem> = items
        .into_iter()
        .filter(|item| item.published >= cutoff)
        .collect();
    debug!(%cutoff, dropped = before - recent.len(), "Applied recency filter");
    recent
}
