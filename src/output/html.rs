//! Static HTML report generation
//!
//! This module renders the harvested record sequence into one
//! self-contained HTML page: a table of thumbnail, linked title, lot
//! number, and current bid, with a generation timestamp header and a
//! summary footer stating the record total and termination reason.

use crate::output::ReportResult;
use crate::walker::WalkOutcome;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Generates the HTML report and writes it to the given path
///
/// # Arguments
///
/// * `outcome` - The completed walk (records plus termination reason)
/// * `generated_at` - Human-readable generation timestamp
/// * `output_path` - Path where the HTML file should be written
pub fn write_report(outcome: &WalkOutcome, generated_at: &str, output_path: &Path) -> ReportResult<()> {
    let html = format_html_report(outcome, generated_at);

    let mut file = File::create(output_path)?;
    file.write_all(html.as_bytes())?;

    Ok(())
}

/// Formats a walk outcome as a standalone HTML document.
///
/// Records appear in harvest order, which is catalog document order.
pub fn format_html_report(outcome: &WalkOutcome, generated_at: &str) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<title>Auction Catalog Report</title>\n");
    html.push_str("<style>\n");
    html.push_str("body { font-family: sans-serif; margin: 2em; }\n");
    html.push_str("table { border-collapse: collapse; width: 100%; }\n");
    html.push_str("th, td { border: 1px solid #ccc; padding: 0.5em; text-align: left; }\n");
    html.push_str("img { max-height: 80px; }\n");
    html.push_str("</style>\n</head>\n<body>\n");

    html.push_str("<h1>Auction Catalog Report</h1>\n");
    html.push_str(&format!("<p>Generated: {}</p>\n", escape(generated_at)));

    html.push_str("<table>\n");
    html.push_str("<tr><th>Lot</th><th>Image</th><th>Title</th><th>Current Bid</th></tr>\n");

    for record in &outcome.records {
        html.push_str("<tr>");
        html.push_str(&format!("<td>{}</td>", escape(&record.lot_number)));
        if record.image_url.is_empty() {
            html.push_str("<td></td>");
        } else {
            html.push_str(&format!(
                "<td><img src=\"{}\" alt=\"{}\"></td>",
                escape(&record.image_url),
                escape(&record.title)
            ));
        }
        html.push_str(&format!(
            "<td><a href=\"{}\">{}</a></td>",
            escape(&record.detail_url),
            escape(&record.title)
        ));
        html.push_str(&format!("<td>{}</td>", escape(&record.current_bid)));
        html.push_str("</tr>\n");
    }

    html.push_str("</table>\n");

    html.push_str(&format!(
        "<p>{} lots harvested from {} page(s); stopped because: {}.</p>\n",
        outcome.records.len(),
        outcome.pages_fetched,
        escape(&outcome.termination.to_string())
    ));

    html.push_str("</body>\n</html>\n");

    html
}

/// Escapes text for safe interpolation into HTML content and attributes
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
