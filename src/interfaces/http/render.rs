//! Plain HTML pages for the server-rendered flow.

use crate::domain::table::{CellValue, Table};
use crate::infrastructure::response::paragraphs;

const TITLE: &str = "AI Data Storyteller";

pub fn index_page() -> String {
    layout(
        TITLE,
        r#"<h1>AI Data Storyteller</h1>
<p>Upload an Excel or CSV file to preview it and generate insights.</p>
<form method="POST" action="/" enctype="multipart/form-data">
    <input type="file" name="file" accept=".xlsx,.xls,.csv" required>
    <button type="submit">Generate Insights</button>
</form>"#,
    )
}

pub fn preview_page(file_id: &str, file_name: &str, preview: &Table) -> String {
    layout(
        &format!("Data Preview - {}", TITLE),
        &format!(
            r#"<h1>Data Preview: {name}</h1>
{table}
<form method="POST" action="/analyze">
    <input type="hidden" name="filename" value="{id}">
    <button type="submit">Generate Story</button>
</form>
<p><a href="/">Upload a different file</a></p>"#,
            name = html_escape(file_name),
            table = table_html(preview),
            id = html_escape(file_id),
        ),
    )
}

pub fn insights_page(report_text: &str, story: &str, preview: &Table) -> String {
    layout(
        &format!("Your Data Story - {}", TITLE),
        &format!(
            r#"<h1>Your Data Story</h1>
<section>
    <h2>Key Insights</h2>
    <pre>{report}</pre>
</section>
<section>
    <h2>Data Story</h2>
    {story}
</section>
<section>
    <h2>Preview</h2>
    {table}
</section>
<p><a href="/">Analyze another file</a></p>"#,
            report = html_escape(report_text),
            story = story_html(story),
            table = table_html(preview),
        ),
    )
}

/// Table with a leading row-index column.
pub fn table_html(table: &Table) -> String {
    let mut html = String::from("<table>\n<thead><tr><th></th>");
    for header in table.headers() {
        html.push_str(&format!("<th>{}</th>", html_escape(header)));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for (index, row) in table.rows().enumerate() {
        html.push_str(&format!("<tr><th>{}</th>", index));
        for cell in row {
            html.push_str(&format!("<td>{}</td>", cell_html(cell)));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>");
    html
}

fn cell_html(cell: &CellValue) -> String {
    html_escape(&cell.to_string())
}

fn story_html(story: &str) -> String {
    paragraphs(story)
        .into_iter()
        .map(|p| format!("<p>{}</p>", html_escape(p).replace('\n', "<br>")))
        .collect::<Vec<_>>()
        .join("\n    ")
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
</head>
<body>
{body}
</body>
</html>"#,
        title = html_escape(title),
        body = body,
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
