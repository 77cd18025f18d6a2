//! Plain-text rendering of the digest.

use super::{EMPTY_MESSAGE, REPORT_SUBTITLE, report_title};
use crate::categorizer::CategorizedGroups;
use crate::models::Summary;
use crate::utils::category_display_name;
use chrono::NaiveDate;
use std::fmt::Write;

/// Render the digest as plain text.
///
/// Sections: title, summary, per-category details, sources. With no groups
/// only [`EMPTY_MESSAGE`] is returned.
pub fn render_text(groups: &CategorizedGroups, summary: &Summary, date: NaiveDate) -> String {
    if groups.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }

    let mut out = String::new();
    writeln!(out, "{}", report_title(date)).unwrap();
    writeln!(out, "{REPORT_SUBTITLE}").unwrap();

    writeln!(out, "\n== Summary ==").unwrap();
    writeln!(
        out,
        "Collected {} database news items today, covering {} categories.",
        summary.total_items, summary.category_count
    )
    .unwrap();

    writeln!(out, "\n== Details ==").unwrap();
    for (category, items) in groups.iter() {
        writeln!(out, "\n{}:", category_display_name(category)).unwrap();
        for item in items {
            writeln!(out, "- {}", item.title).unwrap();
            writeln!(out, "  Source: {}", item.source).unwrap();
            writeln!(out, "  Link: {}", item.url).unwrap();
            writeln!(out, "  Date: {}", item.published).unwrap();
        }
    }

    writeln!(out, "\n== Sources ==").unwrap();
    for source in &summary.sources {
        writeln!(out, "- {source}").unwrap();
    }

    out
}
