//! Sitemap generation.
//!
//! Lists the static routes plus one URL per post and project slug:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/blog/hello-world</loc>
//!     <lastmod>2024-03-01</lastmod>
//!   </url>
//! </urlset>
//! ```
//!
//! Slugs come from the `post_slugs` and `project_slugs` queries, so an
//! unconfigured store still yields a sitemap of the static routes. Slugs that
//! [`is_safe_slug`] rejects get no page, so they get no entry either; the rest
//! are percent-encoded as one path segment.

use crate::types::{SlugEntry, is_safe_slug};
use reqwest::Url;
use tracing::warn;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Routes that exist whatever the content store holds.
pub const STATIC_ROUTES: &[&str] = &["/", "/blog", "/projects"];

/// Single URL entry in the sitemap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlEntry {
    pub loc: String,
    /// `YYYY-MM-DD`
    pub lastmod: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sitemap {
    pub urls: Vec<UrlEntry>,
}

impl Sitemap {
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Render the sitemap XML.
    pub fn into_xml(self) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
        xml.push('\n');

        for entry in self.urls {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
            if let Some(lastmod) = entry.lastmod {
                xml.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
            }
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

/// Build the sitemap for a site at `site_url` (no trailing slash).
pub fn build(site_url: &str, post_slugs: &[SlugEntry], project_slugs: &[SlugEntry]) -> Sitemap {
    let site_url = site_url.trim_end_matches('/');
    let static_routes = STATIC_ROUTES.iter().map(|route| UrlEntry {
        loc: format!("{site_url}{route}"),
        lastmod: None,
    });
    let mut urls: Vec<UrlEntry> = static_routes.collect();

    match Url::parse(site_url) {
        Ok(base) => {
            urls.extend(entries(&base, "blog", post_slugs));
            urls.extend(entries(&base, "projects", project_slugs));
        }
        Err(e) => warn!(site_url, error = %e, "site URL does not parse, listing static routes only"),
    }

    Sitemap { urls }
}

fn entries<'a>(
    base: &'a Url,
    section: &'a str,
    slugs: &'a [SlugEntry],
) -> impl Iterator<Item = UrlEntry> + 'a {
    slugs
        .iter()
        .filter(|entry| is_safe_slug(&entry.slug))
        .filter_map(move |entry| {
            Some(UrlEntry {
                loc: section_url(base, section, &entry.slug)?,
                lastmod: entry
                    .updated_at
                    .map(|t| t.format("%Y-%m-%d").to_string()),
            })
        })
}

/// `<base>/<section>/<slug>`, with `slug` encoded as a single segment.
fn section_url(base: &Url, section: &str, slug: &str) -> Option<String> {
    let mut url = base.clone();
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .push(section)
        .push(slug);
    Some(url.to_string())
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
