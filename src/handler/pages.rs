//! Generated pages
//!
//! Sitemap and home page, both rendered from the site's fixture table.

use std::fmt::Write;

use crate::fixtures::Site;

const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Render the sitemap: one `<url>` entry per fixture, in table order
pub fn render_sitemap(site: &Site) -> String {
    let mut xml = String::with_capacity(128 + 64 * site.table().len());
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(xml, "<urlset xmlns=\"{SITEMAP_NAMESPACE}\">");
    for fixture in site.table().iter() {
        let _ = writeln!(
            xml,
            "  <url><loc>{}</loc></url>",
            escape_markup(&site.url_for(fixture.key))
        );
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Render the home page linking the sitemap and every fixture, sorted by key
pub fn render_homepage(site: &Site) -> String {
    let links = site
        .table()
        .sorted()
        .iter()
        .map(|fixture| {
            let key = escape_markup(fixture.key);
            format!(
                "      <li><a href=\"/{key}\">/{key} → HTTP {}</a></li>",
                fixture.status.as_u16()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<!DOCTYPE html>
<html>
  <head><meta charset="utf-8"><title>Home</title></head>
  <body>
    <h1>Welcome</h1>
    <p>Try your <a href="/sitemap.xml">sitemap</a> or one of the /pageXXX URLs below:</p>
    <ul>
{links}
    </ul>
  </body>
</html>
"#
    )
}

/// Escape text for XML and HTML content and attribute values
fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
