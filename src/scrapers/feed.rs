//! RSS 2.0 and Atom feed reading.
//!
//! The document is walked with `quick-xml`'s event reader. Only fields inside
//! `<item>` (RSS) or `<entry>` (Atom) are collected; channel-level titles and
//! timestamps are ignored.

use super::MAX_ITEMS_PER_SOURCE;
use super::dates::parse_date;
use crate::error::ParseError;
use crate::models::{NewsItem, SourceDescriptor};
use crate::utils::normalize_whitespace;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, info, instrument, warn};

/// Raw fields of one `<item>` / `<entry>`.
#[derive(Debug, Default)]
struct FeedEntry {
    title: String,
    link: String,
    published: Option<String>,
    updated: Option<String>,
}

impl FeedEntry {
    fn into_item(self, source: &str) -> Result<NewsItem, ParseError> {
        let title = normalize_whitespace(&self.title);
        if title.is_empty() {
            return Err(ParseError::MissingTitle);
        }
        let url = self.link.trim().to_string();
        if url.is_empty() {
            return Err(ParseError::MissingLink);
        }
        let stamp = self
            .published
            .or(self.updated)
            .ok_or(ParseError::MissingTimestamp)?;

        Ok(NewsItem {
            title,
            url,
            published: parse_date(&stamp)?,
            source: source.to_string(),
        })
    }

    fn has(&self, field: Field) -> bool {
        match field {
            Field::Title => !self.title.is_empty(),
            Field::Link => !self.link.is_empty(),
            Field::Published => self.published.is_some(),
            Field::Updated => self.updated.is_some(),
        }
    }

    fn append(&mut self, field: Field, text: &str) {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Link => &mut self.link,
            Field::Published => self.published.get_or_insert_with(String::new),
            Field::Updated => self.updated.get_or_insert_with(String::new),
        };
        slot.push_str(text);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    Published,
    Updated,
}

fn field_for(name: &[u8]) -> Option<Field> {
    match name {
        b"title" => Some(Field::Title),
        b"link" => Some(Field::Link),
        b"pubDate" | b"published" | b"dc:date" => Some(Field::Published),
        b"updated" | b"atom:updated" => Some(Field::Updated),
        _ => None,
    }
}

fn is_entry(name: &[u8]) -> bool {
    name == b"item" || name == b"entry"
}

/// Atom `<link href>`; only `rel="alternate"` (or no rel) points at the article.
fn atom_href(e: &BytesStart<'_>) -> Option<String> {
    let rel = e
        .try_get_attribute("rel")
        .ok()
        .flatten()
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()));
    if rel.as_deref().is_some_and(|r| r != "alternate") {
        return None;
    }
    e.try_get_attribute("href")
        .ok()
        .flatten()
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Read the first [`MAX_ITEMS_PER_SOURCE`] entries of a feed document.
///
/// Only direct children of an entry fill its fields, so nested blocks such as
/// Atom `<source>` are ignored. The first element of each field wins; a later
/// `dc:date` after `pubDate` (or a second `title`) is not appended.
/// Entries already read survive a later XML error.
fn read_entries(xml: &str) -> Vec<FeedEntry> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut current: Option<FeedEntry> = None;
    // Element depth below the open entry; 1 means a direct child.
    let mut depth = 0usize;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.name();
                if let Some(entry) = current.as_mut() {
                    depth += 1;
                    field = if depth == 1 {
                        field_for(name.as_ref()).filter(|f| !entry.has(*f))
                    } else {
                        None
                    };
                    if field == Some(Field::Link) {
                        if let Some(href) = atom_href(&e) {
                            entry.link = href;
                            field = None;
                        }
                    }
                } else if is_entry(name.as_ref()) {
                    current = Some(FeedEntry::default());
                    depth = 0;
                    field = None;
                }
            }
            Ok(Event::Empty(e)) => {
                if let Some(entry) = current.as_mut() {
                    if depth == 0 && e.name().as_ref() == b"link" && entry.link.is_empty() {
                        if let Some(href) = atom_href(&e) {
                            entry.link = href;
                        }
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if let (Some(entry), Some(f)) = (current.as_mut(), field) {
                    match e.unescape() {
                        Ok(text) => entry.append(f, &text),
                        Err(err) => debug!(error = %err, "Undecodable feed text"),
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if let (Some(entry), Some(f)) = (current.as_mut(), field) {
                    entry.append(f, &String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::End(_)) => {
                field = None;
                if current.is_some() {
                    if depth == 0 {
                        if let Some(entry) = current.take() {
                            entries.push(entry);
                            if entries.len() == MAX_ITEMS_PER_SOURCE {
                                break;
                            }
                        }
                    } else {
                        depth -= 1;
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!(
                    position = reader.buffer_position(),
                    error = %e,
                    "Malformed feed; keeping entries read so far"
                );
                break;
            }
            _ => {}
        }
    }

    entries
}

/// Extract up to [`MAX_ITEMS_PER_SOURCE`] items from an RSS or Atom document.
///
/// An entry without a title, a link, or any published/updated timestamp is
/// skipped; the rest of the feed is still used.
#[instrument(level = "info", skip_all, fields(source = %descriptor.name))]
pub fn parse_feed(descriptor: &SourceDescriptor, xml: &str) -> Vec<NewsItem> {
    let items: Vec<NewsItem> = read_entries(xml)
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match entry.into_item(&descriptor.name) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(index, error = %e, "Skipping feed entry");
                None
            }
        })
        .collect();

    info!(count = items.len(), "Parsed feed entries");
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SourceGroup, SourceKind};
    use chrono::NaiveDate;

    fn descriptor() -> SourceDescriptor {
        SourceDescriptor::new(
            "Planet PG",
            "https://planet.example.org/rss20.xml",
            SourceKind::Rss,
            SourceGroup::ExpertBlog,
        )
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rss_items() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>Planet PostgreSQL</title>
    <pubDate>Mon, 10 Jun 2024 12:00:00 +0000</pubDate>
    <item>
      <title>Postgres 17 &amp; you</title>
      <link>https://example.org/pg17</link>
      <pubDate>Mon, 10 Jun 2024 08:00:00 +0000</pubDate>
    </item>
    <item>
      <title><![CDATA[Logical <b>replication</b>]]></title>
      <link>https://example.org/logical</link>
      <dc:date>2024-06-09T10:00:00Z</dc:date>
    </item>
  </channel>
</rss>"#;
        let items = parse_feed(&descriptor(), xml);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Postgres 17 & you");
        assert_eq!(items[0].url, "https://example.org/pg17");
        assert_eq!(items[0].published, ymd(2024, 6, 10));
        assert_eq!(items[0].source, "Planet PG");
        assert_eq!(items[1].title, "Logical <b>replication</b>");
        assert_eq!(items[1].published, ymd(2024, 6, 9));
    }

    #[test]
    fn test_atom_entries_fall_back_to_updated() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Blog</title>
  <updated>2024-06-10T00:00:00Z</updated>
  <entry>
    <title>Vacuum tuning</title>
    <link rel="self" href="https://example.org/self.xml"/>
    <link rel="alternate" href="https://example.org/vacuum"/>
    <updated>2024-06-08T09:00:00+02:00</updated>
  </entry>
</feed>"#;
        let items = parse_feed(&descriptor(), xml);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].url, "https://example.org/vacuum");
        assert_eq!(items[0].published, ymd(2024, 6, 8));
    }

    #[test]
    fn test_atom_source_block_is_ignored() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <title>Vacuum tuning</title>
    <link href="https://example.org/vacuum"/>
    <source>
      <title>Upstream Blog</title>
      <link href="https://upstream.example.org/"/>
      <updated>2024-05-01T00:00:00Z</updated>
    </source>
    <updated>2024-06-09T12:00:00Z</updated>
  </entry>
</feed>"#;
        let items = parse_feed(&descriptor(), xml);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Vacuum tuning");
        assert_eq!(items[0].url, "https://example.org/vacuum");
        assert_eq!(items[0].published, ymd(2024, 6, 9));
    }

    #[test]
    fn test_first_published_element_wins() {
        let xml = r#"<rss xmlns:dc="http://purl.org/dc/elements/1.1/"><channel>
            <item>
              <title>Index advisor</title>
              <link>https://example.org/advisor</link>
              <pubDate>Sun, 09 Jun 2024 23:00:00 +0000</pubDate>
              <dc:date>2024-06-01T00:00:00Z</dc:date>
            </item>
            <item>
              <title>Partitioning</title>
              <link>https://example.org/partitioning</link>
              <dc:date>2024-06-10T06:00:00Z</dc:date>
              <pubDate>Sat, 01 Jun 2024 00:00:00 +0000</pubDate>
            </item>
        </channel></rss>"#;
        let items = parse_feed(&descriptor(), xml);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].published, ymd(2024, 6, 9));
        assert_eq!(items[1].published, ymd(2024, 6, 10));
    }

    #[test]
    fn test_entry_without_timestamp_is_skipped() {
        let xml = r#"<rss><channel>
            <item><title>No date</title><link>https://example.org/a</link></item>
            <item><title>Dated</title><link>https://example.org/b</link><pubDate>2024-06-10</pubDate></item>
        </channel></rss>"#;
        let items = parse_feed(&descriptor(), xml);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Dated");
    }

    #[test]
    fn test_truncates_to_five_entries() {
        let body: String = (0..8)
            .map(|i| {
                format!(
                    "<item><title>Post {i}</title><link>https://example.org/{i}</link>\
                     <pubDate>2024-06-10</pubDate></item>"
                )
            })
            .collect();
        let xml = format!("<rss><channel>{body}</channel></rss>");
        let items = parse_feed(&descriptor(), &xml);
        assert_eq!(items.len(), 5);
        assert_eq!(items[4].title, "Post 4");
    }

    #[test]
    fn test_malformed_feed_keeps_earlier_entries() {
        let xml = r#"<rss><channel>
            <item><title>First</title><link>https://example.org/1</link><pubDate>2024-06-10</pubDate></item>
            <item><title>Broken</wrong>"#;
        let items = parse_feed(&descriptor(), xml);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "First");
    }

    #[test]
    fn test_not_a_feed_is_empty() {
        assert!(parse_feed(&descriptor(), "<html><body>hi</body></html>").is_empty());
        assert!(parse_feed(&descriptor(), "").is_empty());
    }
}
