//! Downgrade of the HTML report into chat-flavoured markdown.
//!
//! This is not an HTML parser. It looks for the fixed fragments in
//! [`super::markers`] that [`super::html::render_html`] emits, and pulls the
//! text between them. An item block whose fragments are missing loses only
//! the pieces that can't be found.

use super::markers::*;
use html_escape::decode_html_entities;

/// Text between the first `open` in `haystack` and the next `close` after it.
fn between<'a>(haystack: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let start = haystack.find(open)? + open.len();
    let len = haystack[start..].find(close)?;
    Some(&haystack[start..start + len])
}

fn decode(fragment: &str) -> String {
    decode_html_entities(fragment.trim()).into_owned()
}

/// `### [title](url)` from the `<h4><a href="...">...</a></h4>` of an item.
fn item_heading(block: &str) -> Option<String> {
    let heading = between(block, ITEM_TITLE_OPEN, ITEM_TITLE_CLOSE)?;
    let url = between(heading, LINK_HREF_OPEN, LINK_HREF_CLOSE)?;
    let title = between(heading, LINK_HREF_CLOSE, LINK_CLOSE)?;
    Some(format!("### [{}]({})", decode(title), decode(url)))
}

/// Convert the HTML report to markdown lines joined with `\n`.
pub fn to_markdown(html: &str) -> String {
    let mut lines = Vec::new();

    if let Some(title) = between(html, H1_OPEN, H1_CLOSE) {
        lines.push(format!("# {}\n", decode(title)));
    }

    if let Some(summary) = between(html, SUMMARY_OPEN, SUMMARY_CLOSE) {
        let text = summary
            .replace(PARAGRAPH_OPEN, "")
            .replace(PARAGRAPH_CLOSE, "\n");
        lines.push(format!("\n## Summary\n{}\n", decode(&text)));
    }

    let blocks: Vec<&str> = html.split(ITEM_OPEN).skip(1).collect();
    if !blocks.is_empty() {
        lines.push("\n## Details\n".to_string());
    }
    for block in blocks {
        if let Some(heading) = item_heading(block) {
            lines.push(format!("\n{heading}"));
        }
        if let Some(source) = between(block, SOURCE_OPEN, PARAGRAPH_CLOSE) {
            lines.push(decode(source));
        }
        if let Some(date) = between(block, DATE_OPEN, PARAGRAPH_CLOSE) {
            lines.push(format!("{}\n", decode(date)));
        }
    }

    lines.join("\n")
}
