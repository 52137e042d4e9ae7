//! `sitemap.xml` rendering.

/// Site pages listed ahead of the per-listing detail pages.
pub const STATIC_PAGES: &[&str] = &["", "about.html", "contact.html", "properties.html"];

/// Detail page that renders a single listing by `?id=`.
pub const DETAIL_PAGE: &str = "property-details.html";

const CHANGE_FREQ: &str = "weekly";
const PRIORITY: &str = "0.8";

/// Absolute URLs for the static pages followed by one detail URL per id.
pub fn site_urls<'a>(site_url: &str, ids: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let base = site_url.trim_end_matches('/');
    STATIC_PAGES
        .iter()
        .map(|page| format!("{base}/{page}"))
        .chain(
            ids.into_iter()
                .map(|id| format!("{base}/{DETAIL_PAGE}?id={id}")),
        )
        .collect()
}

/// Render a `<urlset>` document for `urls`.
pub fn render_sitemap(urls: &[String]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for url in urls {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(url)));
        xml.push_str(&format!("    <changefreq>{CHANGE_FREQ}</changefreq>\n"));
        xml.push_str(&format!("    <priority>{PRIORITY}</priority>\n"));
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
