//! Writes a [`Report`] and its items into an output directory.
//!
//! Files are named after the report date, so a second run on the same day
//! replaces the first one's files.

use super::Report;
use crate::models::NewsItem;
use crate::utils::ensure_writable_dir;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write `<date>.txt`, `<date>.html`, `<date>.md` and `<date>.json`.
///
/// # Arguments
///
/// * `report` - The rendered report; its date names the files
/// * `items` - The items behind the report, serialized into the JSON file
/// * `output_dir` - Target directory, created if missing
///
/// # Returns
///
/// The paths written, in the order above.
///
/// # Errors
///
/// Returns an error if the directory is not writable, the items cannot be
/// serialized, or any file write fails. Files written before the failure stay.
#[instrument(level = "info", skip_all, fields(%output_dir, date = %report.date))]
pub async fn write_report(
    report: &Report,
    items: &[NewsItem],
    output_dir: &str,
) -> Result<Vec<String>, Box<dyn Error>> {
    ensure_writable_dir(output_dir).await?;

    let json = serde_json::to_string_pretty(items)?;
    let base = format!("{}/{}", output_dir.trim_end_matches('/'), report.date);
    let outputs = [
        (format!("{base}.txt"), report.text.as_str()),
        (format!("{base}.html"), report.html.as_str()),
        (format!("{base}.md"), report.markdown.as_str()),
        (format!("{base}.json"), json.as_str()),
    ];

    let mut written = Vec::with_capacity(outputs.len());
    for (path, contents) in outputs {
        if let Err(e) = fs::write(&path, contents).await {
            error!(%path, error = %e, "Failed writing report file");
            return Err(e.into());
        }
        info!(%path, bytes = contents.len(), "Wrote report file");
        written.push(path);
    }

    Ok(written)
}
