//! Keyword-based topical categorization.
//!
//! A [`Taxonomy`] maps a category key (e.g. `database_products`) to a list of
//! keywords. An item belongs to every category that has at least one keyword
//! appearing, case-insensitively, in its title. Items matching nothing go to
//! [`OTHER_CATEGORY`].

use crate::models::NewsItem;
use once_cell::sync::Lazy;
use tracing::{debug, instrument};

/// Reserved category for items that match no keyword.
pub const OTHER_CATEGORY: &str = "other";

/// Process-wide taxonomy for database and cloud news.
pub static DATABASE_TAXONOMY: Lazy<Taxonomy> = Lazy::new(|| {
    Taxonomy::new(&[
        (
            "cloud_services",
            &["阿里云", "腾讯云", "华为云", "AWS", "Oracle Cloud"],
        ),
        (
            "database_products",
            &["MySQL", "PostgreSQL", "Oracle", "MongoDB", "Redis", "OceanBase"],
        ),
        (
            "technology",
            &["性能优化", "高可用", "分布式", "架构设计", "最佳实践"],
        ),
        ("industry", &["数据库行业", "技术趋势", "案例分析"]),
    ])
});

#[derive(Debug)]
struct Category {
    key: String,
    /// Lowercased once at construction.
    keywords: Vec<String>,
}

/// Ordered mapping from category key to keywords.
#[derive(Debug)]
pub struct Taxonomy {
    categories: Vec<Category>,
}

impl Taxonomy {
    pub fn new(entries: &[(&str, &[&str])]) -> Self {
        let categories = entries
            .iter()
            .map(|(key, keywords)| Category {
                key: key.to_string(),
                keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();
        Self { categories }
    }

    /// Category keys for `item`, in taxonomy order. Never empty.
    pub fn categorize(&self, item: &NewsItem) -> Vec<&str> {
        let title = item.title.to_lowercase();
        let matched: Vec<&str> = self
            .categories
            .iter()
            .filter(|c| c.keywords.iter().any(|k| title.contains(k.as_str())))
            .map(|c| c.key.as_str())
            .collect();

        if matched.is_empty() {
            vec![OTHER_CATEGORY]
        } else {
            matched
        }
    }

    /// Bucket items by category. An item lands in every bucket it matches.
    #[instrument(level = "debug", skip_all, fields(items = items.len()))]
    pub fn group_by_category(&self, items: &[NewsItem]) -> CategorizedGroups {
        let mut groups = CategorizedGroups::default();
        for item in items {
            for category in self.categorize(item) {
                groups.push(category, item.clone());
            }
        }
        debug!(
            categories = groups.len(),
            memberships = groups.memberships(),
            "Grouped items by category"
        );
        groups
    }
}

/// Category buckets in first-insertion order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CategorizedGroups {
    buckets: Vec<(String, Vec<NewsItem>)>,
}

impl CategorizedGroups {
    fn push(&mut self, category: &str, item: NewsItem) {
        match self.buckets.iter_mut().find(|(key, _)| key == category) {
            Some((_, items)) => items.push(item),
            None => self.buckets.push((category.to_string(), vec![item])),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[NewsItem])> {
        self.buckets
            .iter()
            .map(|(key, items)| (key.as_str(), items.as_slice()))
    }

    /// Number of distinct categories.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Sum of bucket sizes, i.e. item-category memberships.
    pub fn memberships(&self) -> usize {
        self.buckets.iter().map(|(_, items)| items.len()).sum()
    }
}
