//! Styled HTML rendering of the digest.
//!
//! The markup is built from the fragments in [`super::markers`]; the markdown
//! downgrader re-reads it by those same fragments. All item text is
//! entity-escaped so user content can never forge a marker.

use super::markers::*;
use super::{EMPTY_MESSAGE, REPORT_SUBTITLE, report_title};
use crate::categorizer::CategorizedGroups;
use crate::models::Summary;
use crate::utils::category_display_name;
use chrono::NaiveDate;
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;

const STYLESHEET: &str = "\
body { font-family: Arial, sans-serif; margin: 20px; }
h1 { color: #333; }
h2 { color: #666; margin-top: 20px; }
.summary { background: #f5f5f5; padding: 15px; border-radius: 5px; }
.news-item { margin: 10px 0; padding: 10px; border-left: 3px solid #007bff; }
.source { color: #666; font-size: 0.9em; }
.date { color: #999; font-size: 0.8em; }
";

/// Render the digest as a standalone HTML document.
///
/// With no groups only `<h1>` + [`EMPTY_MESSAGE`] is returned.
pub fn render_html(groups: &CategorizedGroups, summary: &Summary, date: NaiveDate) -> String {
    if groups.is_empty() {
        return format!("{H1_OPEN}{}{H1_CLOSE}", encode_text(EMPTY_MESSAGE));
    }

    let mut out = String::new();
    writeln!(out, "<html>\n<head>\n<meta charset=\"utf-8\">").unwrap();
    writeln!(out, "<style>\n{STYLESHEET}</style>\n</head>\n<body>").unwrap();
    writeln!(out, "{H1_OPEN}{}{H1_CLOSE}", encode_text(&report_title(date))).unwrap();
    writeln!(out, "{PARAGRAPH_OPEN}{REPORT_SUBTITLE}{PARAGRAPH_CLOSE}").unwrap();

    writeln!(out, "<h2>Summary</h2>").unwrap();
    writeln!(
        out,
        "{SUMMARY_OPEN}{PARAGRAPH_OPEN}Collected {} database news items today, covering {} categories.{PARAGRAPH_CLOSE}{SUMMARY_CLOSE}",
        summary.total_items, summary.category_count
    )
    .unwrap();

    writeln!(out, "<h2>Details</h2>").unwrap();
    for (category, items) in groups.iter() {
        writeln!(out, "<h3>{}</h3>", encode_text(&category_display_name(category))).unwrap();
        for item in items {
            writeln!(out, "{ITEM_OPEN}").unwrap();
            writeln!(
                out,
                "{ITEM_TITLE_OPEN}{LINK_HREF_OPEN}{}{LINK_HREF_CLOSE}{}{LINK_CLOSE}{ITEM_TITLE_CLOSE}",
                encode_double_quoted_attribute(&item.url),
                encode_text(&item.title)
            )
            .unwrap();
            writeln!(
                out,
                "{SOURCE_OPEN}Source: {}{PARAGRAPH_CLOSE}",
                encode_text(&item.source)
            )
            .unwrap();
            writeln!(out, "{DATE_OPEN}Date: {}{PARAGRAPH_CLOSE}", item.published).unwrap();
            writeln!(out, "</div>").unwrap();
        }
    }

    writeln!(out, "<h2>Sources</h2>\n<ul>").unwrap();
    for source in &summary.sources {
        writeln!(out, "<li>{}</li>", encode_text(source)).unwrap();
    }
    writeln!(out, "</ul>\n</body>\n</html>").unwrap();

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorizer::DATABASE_TAXONOMY;
    use crate::models::NewsItem;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    #[test]
    fn test_empty_is_fixed_message() {
        let groups = DATABASE_TAXONOMY.group_by_category(&[]);
        let summary = Summary::new(&[], &groups);
        let html = render_html(&groups, &summary, date());
        assert_eq!(html, format!("<h1>{EMPTY_MESSAGE}</h1>"));
        assert!(!html.contains(ITEM_OPEN));
        assert!(!html.contains("<h3>"));
    }

    #[test]
    fn test_document_structure() {
        let items = vec![NewsItem {
            title: "MongoDB <8.0> & beyond".to_string(),
            url: "https://example.com/?a=1&b=\"2\"".to_string(),
            published: date(),
            source: "Mongo Blog".to_string(),
        }];
        let groups = DATABASE_TAXONOMY.group_by_category(&items);
        let summary = Summary::new(&items, &groups);
        let html = render_html(&groups, &summary, date());

        assert!(html.contains("<style>"));
        assert!(html.contains("<h1>Database News Daily - 2024/06/10</h1>"));
        assert!(html.contains(SUMMARY_OPEN));
        assert!(html.contains("<h3>Database Products</h3>"));
        assert_eq!(html.matches(ITEM_OPEN).count(), 1);
        assert!(html.contains("MongoDB &lt;8.0&gt; &amp; beyond"));
        assert!(html.contains("href=\"https://example.com/?a=1&amp;b=&quot;2&quot;\""));
        assert!(html.contains("<p class=\"source\">Source: Mongo Blog</p>"));
        assert!(html.contains("<p class=\"date\">Date: 2024-06-10</p>"));
        assert!(html.contains("<li>Mongo Blog</li>"));
    }
}
