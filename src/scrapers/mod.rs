//! Source fetching and parsing.
//!
//! Every configured source goes through the same two steps:
//!
//! 1. **Fetching**: one GET of the source URL through a [`Fetch`] implementation
//! 2. **Parsing**: the body is handed to the [`SiteParser`] picked by the
//!    source's [`SourceKind`]
//!
//! | Kind | Module | Method |
//! |------|--------|--------|
//! | `html` | [`html`] | article-card heuristics with `scraper` |
//! | `rss` | [`feed`] | RSS 2.0 / Atom event reader with `quick-xml` |
//!
//! Both steps degrade to "no items from this source": a failed fetch or an
//! unusable body is logged and yields an empty list, never an error.

pub mod dates;
pub mod feed;
pub mod fetcher;
pub mod html;

pub use fetcher::{Fetch, HttpFetcher};

use crate::error::FetchError;
use crate::models::{NewsItem, SourceDescriptor, SourceKind};
use chrono::NaiveDate;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, instrument, warn};

/// At most this many items are taken from any one source per run.
pub const MAX_ITEMS_PER_SOURCE: usize = 5;

/// Parsing strategy for a source body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteParser {
    Html,
    Feed,
}

impl SiteParser {
    pub fn for_kind(kind: SourceKind) -> Self {
        match kind {
            SourceKind::Html => SiteParser::Html,
            SourceKind::Rss => SiteParser::Feed,
        }
    }

    /// Turn a fetched body into items. `today` dates undated HTML cards.
    pub fn parse(
        self,
        descriptor: &SourceDescriptor,
        body: &str,
        today: NaiveDate,
    ) -> Vec<NewsItem> {
        match self {
            SiteParser::Html => html::parse_page(descriptor, body, today),
            SiteParser::Feed => feed::parse_feed(descriptor, body),
        }
    }
}

/// Fetch and parse one source, bounded by `fetch_timeout`.
///
/// Any failure is logged and turns into an empty list.
#[instrument(level = "info", skip_all, fields(source = %descriptor.name, url = %descriptor.url))]
pub async fn scrape_source<F: Fetch>(
    fetcher: &F,
    descriptor: &SourceDescriptor,
    fetch_timeout: Duration,
    today: NaiveDate,
) -> Vec<NewsItem> {
    let fetched = match timeout(fetch_timeout, fetcher.fetch(&descriptor.url)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout {
            url: descriptor.url.clone(),
            timeout: fetch_timeout,
        }),
    };

    let body = match fetched {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "Fetch failed; source contributes no items");
            return Vec::new();
        }
    };

    let items = SiteParser::for_kind(descriptor.kind).parse(descriptor, &body, today);
    if items.is_empty() {
        info!("Source yielded no items");
    }
    items
}
