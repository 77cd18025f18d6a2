//! Fixed fragments of the HTML report template.
//!
//! [`super::html`] writes these and [`super::markdown`] searches for them, so
//! they must only ever be changed here.

pub const H1_OPEN: &str = "<h1>";
pub const H1_CLOSE: &str = "</h1>";

pub const SUMMARY_OPEN: &str = r#"<div class="summary">"#;
pub const SUMMARY_CLOSE: &str = "</div>";

/// Start of one item block. Everything up to the next occurrence belongs to it.
pub const ITEM_OPEN: &str = r#"<div class="news-item">"#;

pub const ITEM_TITLE_OPEN: &str = "<h4>";
pub const ITEM_TITLE_CLOSE: &str = "</h4>";
pub const LINK_HREF_OPEN: &str = r#"<a href=""#;
pub const LINK_HREF_CLOSE: &str = r#"">"#;
pub const LINK_CLOSE: &str = "</a>";

pub const SOURCE_OPEN: &str = r#"<p class="source">"#;
pub const DATE_OPEN: &str = r#"<p class="date">"#;
pub const PARAGRAPH_OPEN: &str = "<p>";
pub const PARAGRAPH_CLOSE: &str = "</p>";
