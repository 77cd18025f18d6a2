//! One run of the digest: collect, guard, render, write, push.

use crate::aggregator::Aggregator;
use crate::categorizer::Taxonomy;
use crate::error::PushError;
use crate::models::SourceDescriptor;
use crate::outputs::{Report, files};
use crate::pusher::{MessageVariant, Push};
use crate::scrapers::Fetch;
use chrono::NaiveDate;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// What a run ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No recent items; nothing was rendered or pushed.
    NoNews,
    /// The digest was pushed.
    Delivered { items: usize },
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub fetch_timeout: Duration,
    pub output_dir: Option<String>,
    /// `Markdown` pushes the downgraded HTML report, `Text` the plain-text one.
    pub variant: MessageVariant,
}

/// Collect from `sources` and push the digest through `pusher`.
///
/// Source and item failures only shrink the report. A run with zero items
/// stops before rendering and never pushes. Only the push outcome is an error.
///
/// # Arguments
///
/// * `fetcher` - Transport for every source fetch
/// * `pusher` - Delivery channel for the finished digest
/// * `sources` - Sources to collect from
/// * `taxonomy` - Categories the report is grouped by
/// * `options` - Fetch timeout, optional output directory, message variant
/// * `today` - Report date and recency reference
///
/// # Returns
///
/// [`RunOutcome::NoNews`] when nothing recent was found, otherwise
/// [`RunOutcome::Delivered`] with the number of items pushed. A failure to
/// write report files is logged and does not change the outcome.
///
/// # Errors
///
/// Returns the [`PushError`] of a failed or rejected push.
#[instrument(level = "info", skip_all, fields(sources = sources.len(), %today))]
pub async fn generate_and_send<F: Fetch, P: Push>(
    fetcher: &F,
    pusher: &P,
    sources: &[SourceDescriptor],
    taxonomy: &Taxonomy,
    options: &RunOptions,
    today: NaiveDate,
) -> Result<RunOutcome, PushError> {
    let aggregator = Aggregator::new(fetcher, options.fetch_timeout);
    let items = aggregator.collect_all(sources, today).await;

    if items.is_empty() {
        warn!("No news items found today; skipping report");
        return Ok(RunOutcome::NoNews);
    }

    let report = Report::build(&items, taxonomy, today);

    if let Some(dir) = options.output_dir.as_deref() {
        if let Err(e) = files::write_report(&report, &items, dir).await {
            error!(output_dir = %dir, error = %e, "Failed to write report files");
        }
    }

    let content = match options.variant {
        MessageVariant::Markdown => &report.markdown,
        MessageVariant::Text => &report.text,
    };
    pusher.send(content, options.variant).await?;
    info!(items = items.len(), "Daily report sent successfully");
    Ok(RunOutcome::Delivered { items: items.len() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorizer::DATABASE_TAXONOMY;
    use crate::error::FetchError;
    use crate::models::{SourceGroup, SourceKind};
    use std::cell::RefCell;

    struct OneFeed(String);

    impl Fetch for OneFeed {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            if url == "https://blog.example.com/feed" {
                Ok(self.0.clone())
            } else {
                Err(FetchError::Status {
                    url: url.to_string(),
                    status: 500,
                })
            }
        }
    }

    #[derive(Default)]
    struct RecordingPusher {
        sent: RefCell<Vec<(String, MessageVariant)>>,
        fail: bool,
    }

    impl Push for RecordingPusher {
        async fn send(&self, content: &str, variant: MessageVariant) -> Result<(), PushError> {
            self.sent.borrow_mut().push((content.to_string(), variant));
            if self.fail {
                Err(PushError::Rejected {
                    errcode: 45009,
                    errmsg: "api freq out of limit".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn sources() -> Vec<SourceDescriptor> {
        vec![
            SourceDescriptor::new(
                "Planet PG",
                "https://blog.example.com/feed",
                SourceKind::Rss,
                SourceGroup::ExpertBlog,
            ),
            SourceDescriptor::new(
                "Broken",
                "https://broken.example.com/",
                SourceKind::Html,
                SourceGroup::CloudWebsite,
            ),
        ]
    }

    fn options() -> RunOptions {
        RunOptions {
            fetch_timeout: Duration::from_secs(1),
            output_dir: None,
            variant: MessageVariant::Markdown,
        }
    }

    const FEED: &str = "<rss><channel><item><title>Postgres 17 released</title>\
                        <link>http://x</link><pubDate>2024-06-10</pubDate></item></channel></rss>";

    #[tokio::test]
    async fn test_delivers_markdown() {
        let pusher = RecordingPusher::default();
        let outcome = generate_and_send(
            &OneFeed(FEED.to_string()),
            &pusher,
            &sources(),
            &DATABASE_TAXONOMY,
            &options(),
            today(),
        )
        .await
        .unwrap();

        assert_eq!(outcome, RunOutcome::Delivered { items: 1 });
        let sent = pusher.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1, MessageVariant::Markdown);
        assert!(sent[0].0.contains("### [Postgres 17 released](http://x)"));
        assert!(sent[0].0.contains("Planet PG"));
    }

    #[tokio::test]
    async fn test_no_news_skips_push() {
        let stale = FEED.replace("2024-06-10", "2024-06-01");
        let pusher = RecordingPusher::default();
        let outcome = generate_and_send(
            &OneFeed(stale),
            &pusher,
            &sources(),
            &DATABASE_TAXONOMY,
            &options(),
            today(),
        )
        .await
        .unwrap();

        assert_eq!(outcome, RunOutcome::NoNews);
        assert!(pusher.sent.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_push_failure_is_the_run_error() {
        let pusher = RecordingPusher {
            fail: true,
            ..Default::default()
        };
        let err = generate_and_send(
            &OneFeed(FEED.to_string()),
            &pusher,
            &sources(),
            &DATABASE_TAXONOMY,
            &options(),
            today(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, PushError::Rejected { errcode: 45009, .. }));
        assert_eq!(pusher.sent.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_plain_text_variant() {
        let pusher = RecordingPusher::default();
        let options = RunOptions {
            variant: MessageVariant::Text,
            ..options()
        };
        generate_and_send(
            &OneFeed(FEED.to_string()),
            &pusher,
            &sources(),
            &DATABASE_TAXONOMY,
            &options,
            today(),
        )
        .await
        .unwrap();

        let sent = pusher.sent.borrow();
        assert_eq!(sent[0].1, MessageVariant::Text);
        assert!(sent[0].0.contains("== Details =="));
        assert!(sent[0].0.contains("  Link: http://x"));
    }

    #[tokio::test]
    async fn test_writes_output_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().to_str().unwrap().to_string();
        let options = RunOptions {
            output_dir: Some(dir.clone()),
            ..options()
        };
        generate_and_send(
            &OneFeed(FEED.to_string()),
            &RecordingPusher::default(),
            &sources(),
            &DATABASE_TAXONOMY,
            &options,
            today(),
        )
        .await
        .unwrap();

        let text = std::fs::read_to_string(format!("{dir}/2024-06-10.txt")).unwrap();
        assert!(text.contains("- Postgres 17 released"));
    }
}
