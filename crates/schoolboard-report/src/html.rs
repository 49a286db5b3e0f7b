//! HTML timetable page.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use anyhow::Result;
use std::path::Path;

use schoolboard_core::timetable::{entry_label, TimetableGrid};

use crate::labels::Labels;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML page for a resolved timetable grid.
pub fn generate_timetable_html(title: &str, grid: &TimetableGrid, labels: &Labels) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>Timetable: {}</title>\n",
        html_escape(title)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(title)));
    html.push_str(&format!(
        "<p class=\"meta\">{} of {} slots filled | generated {}</p>\n",
        grid.filled(),
        grid.slots.len() * grid.days.len(),
        chrono::Local::now().format("%Y-%m-%d %H:%M")
    ));
    html.push_str("</header>\n");

    html.push_str("<table class=\"timetable\">\n<thead><tr><th>Time</th>");
    for day in &grid.days {
        html.push_str(&format!("<th>{day}</th>"));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for (slot, row) in grid.slots.iter().zip(&grid.rows) {
        html.push_str(&format!("<tr><th class=\"slot\">{}</th>", html_escape(slot)));
        for cell in row {
            match cell {
                Some(entry) => {
                    let time = entry_label(entry)
                        .unwrap_or_else(|| format!("{} - {}", entry.start_time, entry.end_time));
                    html.push_str(&format!(
                        "<td class=\"filled\" title=\"{}\">{}</td>",
                        html_escape(&time),
                        html_escape(&labels.cell_text(entry))
                    ));
                }
                None => html.push_str("<td class=\"empty\">-</td>"),
            }
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody></table>\n");

    if !grid.unplaced.is_empty() {
        html.push_str("<section class=\"unplaced\">\n<h2>Not on the grid</h2>\n<ul>\n");
        for entry in &grid.unplaced {
            html.push_str(&format!(
                "<li>{} {} - {}: {}</li>\n",
                entry.day,
                html_escape(&entry.start_time),
                html_escape(&entry.end_time),
                html_escape(&labels.cell_text(entry))
            ));
        }
        html.push_str("</ul>\n</section>\n");
    }

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML timetable to a file.
pub fn write_timetable_html(
    title: &str,
    grid: &TimetableGrid,
    labels: &Labels,
    path: &Path,
) -> Result<()> {
    let html = generate_timetable_html(title, grid, labels);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --filled: #dbeafe; --muted: #9ca3af; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --filled: #1e3a8a; --muted: #6b7280; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; table-layout: fixed; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
th.slot { white-space: nowrap; width: 11rem; }
.filled { background: var(--filled); }
.empty { color: var(--muted); text-align: center; }
"#;
