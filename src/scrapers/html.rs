//! Article-card scraping for sites that publish no feed.
//!
//! The selectors are generic heuristics (`article`, `.news-item`,
//! `.blog-post`), not per-site rules, so a page whose markup doesn't look like
//! a list of cards simply yields nothing.

use super::MAX_ITEMS_PER_SOURCE;
use super::dates::parse_date;
use crate::error::ParseError;
use crate::models::{NewsItem, SourceDescriptor};
use crate::utils::normalize_whitespace;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

static CARD: Lazy<Selector> =
    Lazy::new(|| Selector::parse("article, .news-item, .blog-post").unwrap());
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("h2, .title").unwrap());
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static DATE: Lazy<Selector> = Lazy::new(|| Selector::parse(".date, .time, time").unwrap());

/// Extract up to [`MAX_ITEMS_PER_SOURCE`] items from an HTML page.
///
/// Only the first five cards are considered; a card without a title or link,
/// or with a date that can't be read, is skipped. A card without any date is
/// dated `today`.
#[instrument(level = "info", skip_all, fields(source = %descriptor.name))]
pub fn parse_page(descriptor: &SourceDescriptor, body: &str, today: NaiveDate) -> Vec<NewsItem> {
    let document = Html::parse_document(body);
    let base = Url::parse(&descriptor.url).ok();

    let items: Vec<NewsItem> = document
        .select(&CARD)
        .take(MAX_ITEMS_PER_SOURCE)
        .enumerate()
        .filter_map(|(index, card)| {
            match parse_card(card, base.as_ref(), &descriptor.name, today) {
                Ok(item) => Some(item),
                Err(e) => {
                    match e {
                        ParseError::UnparsableDate(_) => warn!(index, error = %e, "Skipping card"),
                        _ => debug!(index, error = %e, "Skipping card"),
                    }
                    None
                }
            }
        })
        .collect();

    info!(count = items.len(), "Parsed HTML cards");
    items
}

fn parse_card(
    card: ElementRef<'_>,
    base: Option<&Url>,
    source: &str,
    today: NaiveDate,
) -> Result<NewsItem, ParseError> {
    let title = card
        .select(&TITLE)
        .next()
        .map(|t| normalize_whitespace(&t.text().collect::<String>()))
        .filter(|t| !t.is_empty())
        .ok_or(ParseError::MissingTitle)?;

    let url = card
        .select(&LINK)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(|href| resolve(base, href))
        .ok_or(ParseError::MissingLink)?;

    let published = match card.select(&DATE).next() {
        Some(date) => {
            let raw = date
                .value()
                .attr("datetime")
                .map(str::to_string)
                .unwrap_or_else(|| date.text().collect::<String>());
            parse_date(&raw)?
        }
        None => today,
    };

    Ok(NewsItem {
        title,
        url,
        published,
        source: source.to_string(),
    })
}

/// Absolute form of `href`, or `href` untouched when it can't be joined.
fn resolve(base: Option<&Url>, href: &str) -> String {
    base.and_then(|b| b.join(href).ok())
        .map(|u| u.to_string())
        .unwrap_or_else(|| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SourceGroup, SourceKind};

    fn descriptor() -> SourceDescriptor {
        SourceDescriptor::new(
            "Cloud Blog",
            "https://cloud.example.com/news/",
            SourceKind::Html,
            SourceGroup::CloudWebsite,
        )
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    #[test]
    fn test_parses_cards() {
        let html = r#"
            <html><body>
              <article>
                <h2>  Redis 8
                  GA </h2>
                <a href="/news/redis-8">read</a>
                <span class="date">2024-06-09</span>
              </article>
              <div class="news-item">
                <div class="title">MySQL 9.0 released</div>
                <a href="https://mysql.example.com/9">more</a>
                <time datetime="2024-06-10T08:00:00Z">today</time>
              </div>
            </body></html>
        "#;
        let items = parse_page(&descriptor(), html, today());

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Redis 8 GA");
        assert_eq!(items[0].url, "https://cloud.example.com/news/redis-8");
        assert_eq!(items[0].published, NaiveDate::from_ymd_opt(2024, 6, 9).unwrap());
        assert_eq!(items[0].source, "Cloud Blog");
        assert_eq!(items[1].url, "https://mysql.example.com/9");
        assert_eq!(items[1].published, today());
    }

    #[test]
    fn test_missing_date_defaults_to_today() {
        let html = r#"<div class="blog-post"><h2>Undated</h2><a href="x">x</a></div>"#;
        let items = parse_page(&descriptor(), html, today());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].published, today());
    }

    #[test]
    fn test_malformed_cards_are_skipped() {
        let html = r#"
            <article><a href="/no-title">no title</a></article>
            <article><h2>No link</h2></article>
            <article><h2>Bad date</h2><a href="/b">b</a><span class="date">soon</span></article>
            <article><h2>Good</h2><a href="/good">g</a></article>
        "#;
        let items = parse_page(&descriptor(), html, today());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Good");
    }

    #[test]
    fn test_truncates_to_five() {
        let html: String = (0..8)
            .map(|i| format!(r#"<article><h2>Item {i}</h2><a href="/{i}">x</a></article>"#))
            .collect();
        let items = parse_page(&descriptor(), &html, today());
        assert_eq!(items.len(), 5);
        assert_eq!(items[4].title, "Item 4");
    }

    #[test]
    fn test_no_cards_is_empty() {
        let items = parse_page(&descriptor(), "<html><p>nothing</p></html>", today());
        assert!(items.is_empty());
    }
}
