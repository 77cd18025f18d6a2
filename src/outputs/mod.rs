//! Report generation in text, HTML and markdown, plus optional files on disk.
//!
//! # Submodules
//!
//! - [`text`]: plain-text report
//! - [`html`]: styled HTML report
//! - [`markdown`]: chat markdown, downgraded from the HTML report
//! - [`markers`]: the HTML fragments shared by [`html`] and [`markdown`]
//! - [`files`]: writes a [`Report`] into an output directory
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── 2024-06-10.txt
//! ├── 2024-06-10.html
//! ├── 2024-06-10.md
//! └── 2024-06-10.json   # the collected items
//! ```

pub mod files;
pub mod html;
pub mod markdown;
pub mod markers;
pub mod text;

use crate::categorizer::Taxonomy;
use crate::models::{NewsItem, Summary};
use chrono::NaiveDate;
use tracing::{info, instrument};

/// Whole report body when there is nothing to report.
pub const EMPTY_MESSAGE: &str = "No database news today.";

pub const REPORT_SUBTITLE: &str = "Compiled automatically by the database news assistant.";

pub fn report_title(date: NaiveDate) -> String {
    format!("Database News Daily - {}", date.format("%Y/%m/%d"))
}

/// All renderings of one run's items.
#[derive(Debug, Clone)]
pub struct Report {
    pub date: NaiveDate,
    pub text: String,
    pub html: String,
    /// Chat payload, derived from `html`.
    pub markdown: String,
}

impl Report {
    #[instrument(level = "info", skip_all, fields(items = items.len(), %date))]
    pub fn build(items: &[NewsItem], taxonomy: &Taxonomy, date: NaiveDate) -> Self {
        let groups = taxonomy.group_by_category(items);
        let summary = Summary::new(items, &groups);

        let text = text::render_text(&groups, &summary, date);
        let html = html::render_html(&groups, &summary, date);
        let markdown = markdown::to_markdown(&html);

        info!(
            categories = summary.category_count,
            sources = summary.sources.len(),
            text_bytes = text.len(),
            html_bytes = html.len(),
            markdown_bytes = markdown.len(),
            "Rendered report"
        );

        Self {
            date,
            text,
            html,
            markdown,
        }
    }
}
