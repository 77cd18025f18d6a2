//! Data models shared by the scrapers, the categorizer and the report outputs.
//!
//! - [`SourceDescriptor`]: one configured news origin
//! - [`NewsItem`]: one normalized article, whatever the source kind
//! - [`Summary`]: the totals printed at the top of every report

use crate::categorizer::CategorizedGroups;
use chrono::NaiveDate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// How the body behind a source URL is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Scrape article cards out of an HTML page.
    Html,
    /// Read entries from an RSS or Atom feed.
    Rss,
}

/// The configuration collection a source was listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceGroup {
    CloudWebsite,
    ExpertBlog,
}

/// A configured news origin. Read-only for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    /// Display label, copied into every item from this source.
    pub name: String,
    pub url: String,
    pub kind: SourceKind,
    pub group: SourceGroup,
}

impl SourceDescriptor {
    pub fn new(name: &str, url: &str, kind: SourceKind, group: SourceGroup) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            kind,
            group,
        }
    }
}

/// A normalized news record.
///
/// `title` and `url` are never empty: parsers drop candidates that would
/// violate this before a `NewsItem` is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    /// Calendar date of publication; time of day is not tracked.
    pub published: NaiveDate,
    /// Name of the originating [`SourceDescriptor`].
    pub source: String,
}

/// Totals for the summary block of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total_items: usize,
    pub category_count: usize,
    /// Distinct source names, in first-seen order.
    pub sources: Vec<String>,
}

impl Summary {
    pub fn new(items: &[NewsItem], groups: &CategorizedGroups) -> Self {
        Self {
            total_items: items.len(),
            category_count: groups.len(),
            sources: items.iter().map(|i| i.source.clone()).unique().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorizer::DATABASE_TAXONOMY;

    fn item(title: &str, source: &str) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            url: "https://example.com/a".to_string(),
            published: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            source: source.to_string(),
        }
    }

    #[test]
    fn test_summary_counts_distinct_sources_in_order() {
        let items = vec![
            item("Redis 8 ships", "Redis Blog"),
            item("MySQL HeatWave update", "Oracle News"),
            item("Redis on Kubernetes", "Redis Blog"),
        ];
        let groups = DATABASE_TAXONOMY.group_by_category(&items);
        let summary = Summary::new(&items, &groups);

        assert_eq!(summary.total_items, 3);
        assert_eq!(summary.category_count, 1);
        assert_eq!(summary.sources, vec!["Redis Blog", "Oracle News"]);
    }

    #[test]
    fn test_news_item_serialization() {
        let json = serde_json::to_string(&item("Postgres 17 released", "Planet PG")).unwrap();
        assert!(json.contains("\"published\":\"2024-06-10\""));
        assert!(json.contains("Planet PG"));
    }
}
