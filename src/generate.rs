//! HTML site generation.
//!
//! Renders a [`SiteContent`] snapshot into static pages for the blog and
//! projects sections.
//!
//! ## Generated Pages
//!
//! ```text
//! dist/
//! ├── index.html                 # Home: latest posts + featured projects
//! ├── blog/
//! │   ├── index.html             # Post list, or "No posts published yet."
//! │   └── hello-world/index.html # One page per post, rich body rendered
//! ├── projects/
//! │   ├── index.html             # Project grid, or an empty state
//! │   └── atlas/index.html       # Overview, features, challenges, process
//! └── sitemap.xml
//! ```
//!
//! Every section has an empty state, so a site built against an unconfigured
//! or unreachable store is complete, just empty.
//!
//! ## Images
//!
//! Image URLs come from [`ImageUrlBuilder`] with `srcset` candidates and
//! automatic format. A field with no asset renders nothing. Asking for a URL
//! without a configured store is a [`ContentError`] and aborts the build.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping.

use crate::config::Settings;
use crate::image::ImageUrlBuilder;
use crate::outcome::ContentError;
use crate::sitemap;
use crate::snapshot::SiteContent;
use crate::types::{
    Block, BlogPost, ImageRef, MarkDef, Project, Span, TextBlock, is_safe_slug,
};
use chrono::{DateTime, Utc};
use maud::{DOCTYPE, Markup, html};
use reqwest::Url;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("content error: {0}")]
    Content(#[from] ContentError),
}

const CSS: &str = include_str!("../static/style.css");

const SITE_TITLE: &str = "Folio";
const HOME_POST_COUNT: usize = 3;
const CARD_WIDTHS: &[u32] = &[400, 800];
const HERO_WIDTHS: &[u32] = &[800, 1200, 1600];

pub const NO_POSTS: &str = "No posts published yet.";
pub const NO_PROJECTS: &str = "No projects to show yet.";
pub const NO_FEATURED: &str = "Featured work is coming soon.";

/// What a build wrote.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateReport {
    pub output_dir: PathBuf,
    /// Page paths relative to `output_dir`.
    pub pages: Vec<String>,
    /// Slugs that could not be used as a path segment.
    pub skipped: Vec<String>,
    pub sitemap_urls: usize,
}

/// Write the site for `content` into `output_dir`.
pub fn generate(
    content: &SiteContent,
    settings: &Settings,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    let mut report = GenerateReport {
        output_dir: output_dir.to_path_buf(),
        ..GenerateReport::default()
    };
    fs::create_dir_all(output_dir)?;

    write_page(output_dir, "index.html", render_home(content, settings)?, &mut report)?;
    write_page(
        output_dir,
        "blog/index.html",
        render_blog_index(&content.posts, settings)?,
        &mut report,
    )?;
    write_page(
        output_dir,
        "projects/index.html",
        render_projects_index(&content.projects, settings)?,
        &mut report,
    )?;

    for summary in &content.posts {
        if !is_safe_slug(&summary.slug) {
            warn!(slug = %summary.slug, "skipping post with unusable slug");
            report.skipped.push(summary.slug.clone());
            continue;
        }
        let post = content.post(&summary.slug).unwrap_or(summary);
        write_page(
            output_dir,
            &format!("blog/{}/index.html", post.slug),
            render_post_page(post, settings)?,
            &mut report,
        )?;
    }

    for summary in &content.projects {
        if !is_safe_slug(&summary.slug) {
            warn!(slug = %summary.slug, "skipping project with unusable slug");
            report.skipped.push(summary.slug.clone());
            continue;
        }
        let project = content.project(&summary.slug).unwrap_or(summary);
        write_page(
            output_dir,
            &format!("projects/{}/index.html", project.slug),
            render_project_page(project, settings)?,
            &mut report,
        )?;
    }

    let sitemap = sitemap::build(
        settings.site_url(),
        &content.post_slugs,
        &content.project_slugs,
    );
    report.sitemap_urls = sitemap.len();
    fs::write(output_dir.join("sitemap.xml"), sitemap.into_xml())?;

    info!(
        pages = report.pages.len(),
        output = %output_dir.display(),
        "site generated"
    );
    Ok(report)
}

fn write_page(
    output_dir: &Path,
    relative: &str,
    page: Markup,
    report: &mut GenerateReport,
) -> Result<(), GenerateError> {
    let path = output_dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, page.into_string())?;
    report.pages.push(relative.to_string());
    Ok(())
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, description: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                @if let Some(description) = description {
                    meta name="description" content=(description);
                }
                style { (CSS) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the site header with the section links
fn site_header(current: &str) -> Markup {
    let link = |href: &str, label: &str, section: &str| {
        html! {
            li class=[(current == section).then_some("current")] {
                a href=(href) { (label) }
            }
        }
    };
    html! {
        header.site-header {
            a.site-title href="/" { (SITE_TITLE) }
            nav.site-nav {
                ul {
                    (link("/", "Home", "home"))
                    (link("/blog", "Blog", "blog"))
                    (link("/projects", "Projects", "projects"))
                }
            }
        }
    }
}

fn empty_state(message: &str) -> Markup {
    html! {
        p.empty-state { (message) }
    }
}

/// `<img>` with a srcset for `image`, or nothing when it has no asset.
fn responsive_image(
    settings: &Settings,
    image: Option<&ImageRef>,
    widths: &[u32],
    sizes: &str,
) -> Result<Option<Markup>, ContentError> {
    let Some(image) = image else {
        return Ok(None);
    };
    let Some(builder) = ImageUrlBuilder::for_image(settings, image).into_result()? else {
        return Ok(None);
    };
    let builder = builder.auto_format();
    let default_width = widths.first().copied().unwrap_or(800);
    let src = builder.clone().width(default_width).url();
    let srcset = builder.srcset(widths);
    let alt = image.alt.as_deref().unwrap_or_default();
    Ok(Some(html! {
        img src=(src) srcset=(srcset) sizes=(sizes) alt=(alt) loading="lazy";
    }))
}

fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

fn post_card(post: &BlogPost, settings: &Settings) -> Result<Markup, ContentError> {
    let image = responsive_image(
        settings,
        post.main_image.as_ref(),
        CARD_WIDTHS,
        "(max-width: 800px) 100vw, 400px",
    )?;
    Ok(html! {
        article.post-card {
            @if let Some(image) = image {
                a.card-image href={ "/blog/" (post.slug) } { (image) }
            }
            h2 { a href={ "/blog/" (post.slug) } { (post.title) } }
            (post_meta(post))
            @if !post.excerpt.is_empty() {
                p.excerpt { (post.excerpt) }
            }
        }
    })
}

fn post_meta(post: &BlogPost) -> Markup {
    html! {
        p.post-meta {
            @if let Some(date) = &post.published_at {
                time datetime=(date.to_rfc3339()) { (format_date(date)) }
            }
            @if let Some(author) = post.author_name() {
                span.author { " by " (author) }
            }
            @if !post.categories.is_empty() {
                span.categories {
                    @for category in &post.categories {
                        span.category { (category) }
                    }
                }
            }
        }
    }
}

fn project_card(project: &Project, settings: &Settings) -> Result<Markup, ContentError> {
    let image = responsive_image(
        settings,
        project.main_image.as_ref(),
        CARD_WIDTHS,
        "(max-width: 800px) 100vw, 400px",
    )?;
    Ok(html! {
        article.project-card {
            @if let Some(image) = image {
                a.card-image href={ "/projects/" (project.slug) } { (image) }
            }
            h2 { a href={ "/projects/" (project.slug) } { (project.title) } }
            @if let Some(subtitle) = &project.subtitle {
                p.subtitle { (subtitle) }
            }
            p { (project.description) }
            (tech_stack(&project.tech_stack))
        }
    })
}

fn tech_stack(stack: &[String]) -> Markup {
    html! {
        @if !stack.is_empty() {
            ul.tech-stack {
                @for tech in stack {
                    li { (tech) }
                }
            }
        }
    }
}

// ============================================================================
// Rich text
// ============================================================================

/// Renders a portable-text body. Consecutive list items are grouped into one
/// list; unknown block types are skipped.
fn render_body(blocks: &[Block], settings: &Settings) -> Result<Markup, ContentError> {
    let mut parts = Vec::new();
    let mut i = 0;
    while i < blocks.len() {
        match &blocks[i] {
            Block::Text(block) if block.list_item.is_some() => {
                let kind = block.list_item.as_deref();
                let start = i;
                while let Some(Block::Text(next)) = blocks.get(i)
                    && next.list_item.as_deref() == kind
                {
                    i += 1;
                }
                let items: Vec<&TextBlock> = blocks[start..i]
                    .iter()
                    .filter_map(|b| match b {
                        Block::Text(t) => Some(t),
                        _ => None,
                    })
                    .collect();
                parts.push(render_list(kind == Some("number"), &items));
                continue;
            }
            Block::Text(block) => parts.push(render_text_block(block)),
            Block::Image(image) => {
                if let Some(img) =
                    responsive_image(settings, Some(image), HERO_WIDTHS, "(max-width: 800px) 100vw, 800px")?
                {
                    parts.push(html! {
                        figure {
                            (img)
                            @if let Some(caption) = &image.caption {
                                figcaption { (caption) }
                            }
                        }
                    });
                }
            }
            Block::Unknown => {}
        }
        i += 1;
    }
    Ok(html! {
        @for part in parts { (part) }
    })
}

fn render_list(numbered: bool, items: &[&TextBlock]) -> Markup {
    html! {
        @if numbered {
            ol { @for item in items { li { (render_spans(item)) } } }
        } @else {
            ul { @for item in items { li { (render_spans(item)) } } }
        }
    }
}

fn render_text_block(block: &TextBlock) -> Markup {
    let spans = render_spans(block);
    html! {
        @match block.style() {
            "h1" => h1 { (spans) },
            "h2" => h2 { (spans) },
            "h3" => h3 { (spans) },
            "h4" => h4 { (spans) },
            "blockquote" => blockquote { (spans) },
            _ => p { (spans) },
        }
    }
}

fn render_spans(block: &TextBlock) -> Markup {
    html! {
        @for span in &block.children {
            (render_span(span, &block.mark_defs))
        }
    }
}

/// Wraps a span's text in one element per mark, innermost first.
/// `href` when it is an http(s) or mailto link, or with `relative` a path on
/// this site or a fragment. Anything else (`javascript:`, `data:`) is dropped.
fn link_target(href: &str, relative: bool) -> Option<&str> {
    let href = href.trim();
    if relative
        && !href.contains('\\')
        && ((href.starts_with('/') && !href.starts_with("//")) || href.starts_with('#'))
    {
        return Some(href);
    }
    let url = Url::parse(href).ok()?;
    matches!(url.scheme(), "http" | "https" | "mailto").then_some(href)
}

fn render_span(span: &Span, mark_defs: &[MarkDef]) -> Markup {
    let mut markup = html! { (span.text) };
    for mark in span.marks.iter().rev() {
        markup = match mark.as_str() {
            "strong" => html! { strong { (markup) } },
            "em" => html! { em { (markup) } },
            "code" => html! { code { (markup) } },
            "underline" => html! { u { (markup) } },
            "strike-through" => html! { s { (markup) } },
            key => match mark_defs
                .iter()
                .find(|d| d.key == key)
                .and_then(|d| d.href.as_deref())
                .and_then(|href| link_target(href, true))
            {
                Some(href) => html! { a href=(href) rel="noopener" { (markup) } },
                None => markup,
            },
        };
    }
    markup
}

// ============================================================================
// Page Renderers
// ============================================================================

fn render_home(content: &SiteContent, settings: &Settings) -> Result<Markup, ContentError> {
    let posts = content
        .posts
        .iter()
        .take(HOME_POST_COUNT)
        .map(|p| post_card(p, settings))
        .collect::<Result<Vec<_>, _>>()?;
    let featured = content
        .featured
        .iter()
        .map(|p| project_card(p, settings))
        .collect::<Result<Vec<_>, _>>()?;

    let body = html! {
        (site_header("home"))
        main.home-page {
            section.featured {
                h1 { "Featured work" }
                @if featured.is_empty() {
                    (empty_state(NO_FEATURED))
                } @else {
                    div.project-grid { @for card in &featured { (card) } }
                }
            }
            section.latest-posts {
                h1 { "Latest writing" }
                @if posts.is_empty() {
                    (empty_state(NO_POSTS))
                } @else {
                    @for card in &posts { (card) }
                    a.more href="/blog" { "All posts" }
                }
            }
        }
    };
    Ok(base_document(SITE_TITLE, None, body))
}

fn render_blog_index(posts: &[BlogPost], settings: &Settings) -> Result<Markup, ContentError> {
    let cards = posts
        .iter()
        .map(|p| post_card(p, settings))
        .collect::<Result<Vec<_>, _>>()?;
    let body = html! {
        (site_header("blog"))
        main.blog-index {
            h1 { "Blog" }
            @if cards.is_empty() {
                (empty_state(NO_POSTS))
            } @else {
                @for card in &cards { (card) }
            }
        }
    };
    Ok(base_document(&format!("Blog | {SITE_TITLE}"), None, body))
}

fn render_post_page(post: &BlogPost, settings: &Settings) -> Result<Markup, ContentError> {
    let hero = responsive_image(
        settings,
        post.main_image.as_ref(),
        HERO_WIDTHS,
        "(max-width: 800px) 100vw, 800px",
    )?;
    let body = match &post.body {
        Some(blocks) => Some(render_body(blocks, settings)?),
        None => None,
    };
    let description = post
        .seo
        .as_ref()
        .and_then(|s| s.description.as_deref())
        .or(Some(post.excerpt.as_str()).filter(|e| !e.is_empty()));

    let page = html! {
        (site_header("blog"))
        main.post-page {
            article {
                header {
                    h1 { (post.title) }
                    (post_meta(post))
                }
                @if let Some(hero) = hero {
                    figure.hero { (hero) }
                }
                @if let Some(body) = body {
                    div.post-body { (body) }
                } @else if !post.excerpt.is_empty() {
                    p.excerpt { (post.excerpt) }
                }
            }
            a.back href="/blog" { "All posts" }
        }
    };
    Ok(base_document(
        &format!("{} | {SITE_TITLE}", post.page_title()),
        description,
        page,
    ))
}

fn render_projects_index(
    projects: &[Project],
    settings: &Settings,
) -> Result<Markup, ContentError> {
    let cards = projects
        .iter()
        .map(|p| project_card(p, settings))
        .collect::<Result<Vec<_>, _>>()?;
    let body = html! {
        (site_header("projects"))
        main.projects-index {
            h1 { "Projects" }
            @if cards.is_empty() {
                (empty_state(NO_PROJECTS))
            } @else {
                div.project-grid { @for card in &cards { (card) } }
            }
        }
    };
    Ok(base_document(&format!("Projects | {SITE_TITLE}"), None, body))
}

fn render_project_page(project: &Project, settings: &Settings) -> Result<Markup, ContentError> {
    let hero = responsive_image(
        settings,
        project.main_image.as_ref(),
        HERO_WIDTHS,
        "(max-width: 800px) 100vw, 800px",
    )?;
    let page = html! {
        (site_header("projects"))
        main.project-page {
            article {
                header {
                    h1 { (project.title) }
                    @if let Some(subtitle) = &project.subtitle {
                        p.subtitle { (subtitle) }
                    }
                    (tech_stack(&project.tech_stack))
                    p.links {
                        @if let Some(url) = project.live_url.as_deref().and_then(|u| link_target(u, false)) {
                            a href=(url) rel="noopener" { "Live site" }
                        }
                        @if let Some(url) = project.github_url.as_deref().and_then(|u| link_target(u, false)) {
                            a href=(url) rel="noopener" { "Source" }
                        }
                    }
                }
                @if let Some(hero) = hero {
                    figure.hero { (hero) }
                }
                p.description { (project.description) }
                @if let Some(overview) = &project.overview {
                    section.overview {
                        h2 { "Overview" }
                        p { (overview) }
                    }
                }
                @if !project.features.is_empty() {
                    section.features {
                        h2 { "Features" }
                        ul { @for feature in &project.features { li { (feature) } } }
                    }
                }
                @if !project.challenges.is_empty() {
                    section.challenges {
                        h2 { "Challenges" }
                        dl {
                            @for c in &project.challenges {
                                dt { (c.challenge) }
                                dd { (c.solution) }
                            }
                        }
                    }
                }
                @if let Some(process) = &project.development_process {
                    section.process {
                        h2 { "Development process" }
                        @if let Some(summary) = &process.summary {
                            p { (summary) }
                        }
                        ol.phases {
                            @for phase in &process.phases {
                                li {
                                    h3 { (phase.title) }
                                    @if let Some(duration) = &phase.duration {
                                        span.duration { (duration) }
                                    }
                                    @if let Some(description) = &phase.description {
                                        p { (description) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
            a.back href="/projects" { "All projects" }
        }
    };
    Ok(base_document(
        &format!("{} | {SITE_TITLE}", project.title),
        Some(project.description.as_str()).filter(|d| !d.is_empty()),
        page,
    ))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{
        configured_settings, post, post_with_body, project, project_with_details, sample_content,
    };
    use crate::types::SlugEntry;
    use tempfile::TempDir;

    #[test]
    fn base_document_includes_doctype() {
        let doc = base_document("Test", None, html! { p { "test" } }).into_string();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>Test</title>"));
    }

    #[test]
    fn site_header_marks_current_section() {
        let header = site_header("blog").into_string();
        assert!(header.contains(r#"<li class="current"><a href="/blog">"#));
        assert!(header.contains("site-nav"));
    }

    #[test]
    fn blog_index_empty_state() {
        let html = render_blog_index(&[], &Settings::unconfigured())
            .unwrap()
            .into_string();
        assert!(html.contains(NO_POSTS));
        assert!(!html.contains("post-card"));
    }

    #[test]
    fn blog_index_lists_posts() {
        let posts = vec![post("hello", Some("2024-03-01T09:00:00Z"))];
        let html = render_blog_index(&posts, &configured_settings())
            .unwrap()
            .into_string();
        assert!(html.contains(r#"href="/blog/hello""#));
        assert!(html.contains("March 1, 2024"));
        assert!(html.contains("Sam Rivera"));
        assert!(!html.contains(NO_POSTS));
    }

    #[test]
    fn projects_index_empty_state() {
        let html = render_projects_index(&[], &Settings::unconfigured())
            .unwrap()
            .into_string();
        assert!(html.contains(NO_PROJECTS));
    }

    #[test]
    fn post_body_renders_blocks() {
        let html = render_post_page(&post_with_body("hello"), &configured_settings())
            .unwrap()
            .into_string();
        assert!(html.contains("<h2>Getting started</h2>"));
        assert!(html.contains(
            r#"<a href="https://www.rust-lang.org" rel="noopener">the book</a>"#
        ));
        assert!(html.contains("<strong> twice.</strong>"));
        assert!(html.contains("<ul><li>first</li><li>second</li></ul>"));
        assert!(html.contains("abc123-800x600.jpg?w=800&amp;auto=format"));
        assert!(html.contains(r#"alt="Diagram""#));
    }

    #[test]
    fn body_image_without_store_is_an_error() {
        let result = render_post_page(&post_with_body("hello"), &Settings::unconfigured());
        assert!(matches!(result, Err(ContentError::NotConfigured)));
    }

    #[test]
    fn numbered_list_uses_ol() {
        let blocks: Vec<Block> = serde_json::from_value(serde_json::json!([
            { "_type": "block", "listItem": "number", "children": [{ "text": "one" }] },
            { "_type": "block", "listItem": "number", "children": [{ "text": "two" }] },
            { "_type": "block", "children": [{ "text": "after" }] }
        ]))
        .unwrap();
        let html = render_body(&blocks, &configured_settings())
            .unwrap()
            .into_string();
        assert_eq!(html, "<ol><li>one</li><li>two</li></ol><p>after</p>");
    }

    #[test]
    fn project_page_renders_long_form_fields() {
        let html = render_project_page(&project_with_details("atlas"), &configured_settings())
            .unwrap()
            .into_string();
        assert!(html.contains("An overview."));
        assert!(html.contains("<dt>Latency</dt><dd>Caching</dd>"));
        assert!(html.contains("Prototype"));
        assert!(html.contains("2 weeks"));
        assert!(html.contains(r#"href="https://github.com/example/atlas""#));
    }

    #[test]
    fn link_targets_limited_to_web_and_mail() {
        assert_eq!(link_target("https://a.dev/x", false), Some("https://a.dev/x"));
        assert_eq!(link_target("mailto:sam@a.dev", false), Some("mailto:sam@a.dev"));
        assert_eq!(link_target("javascript:alert(1)", false), None);
        assert_eq!(link_target(" JavaScript:alert(1)", true), None);
        assert_eq!(link_target("data:text/html,hi", true), None);
        assert_eq!(link_target("/blog/hello", true), Some("/blog/hello"));
        assert_eq!(link_target("#intro", true), Some("#intro"));
        assert_eq!(link_target("/blog/hello", false), None);
        assert_eq!(link_target("//evil.example", true), None);
        assert_eq!(link_target("/\\evil.example", true), None);
    }

    #[test]
    fn script_links_render_as_text() {
        let span = Span {
            text: "click".into(),
            marks: vec!["k1".into()],
        };
        let defs = [MarkDef {
            key: "k1".into(),
            href: Some("javascript:alert(1)".into()),
            ..MarkDef::default()
        }];
        let html = render_span(&span, &defs).into_string();
        assert_eq!(html, "click");

        let mut project = project_with_details("atlas");
        project.live_url = Some("javascript:alert(1)".into());
        let html = render_project_page(&project, &configured_settings())
            .unwrap()
            .into_string();
        assert!(!html.contains("javascript:"));
        assert!(!html.contains("Live site"));
        assert!(html.contains(r#"href="https://github.com/example/atlas""#));
    }

    #[test]
    fn project_page_without_optional_fields() {
        let html = render_project_page(&project("bare", None, false), &Settings::unconfigured())
            .unwrap()
            .into_string();
        assert!(html.contains("Project bare"));
        assert!(!html.contains("Overview"));
        assert!(!html.contains("Development process"));
    }

    #[test]
    fn content_is_escaped() {
        let mut p = post("x", None);
        p.title = "<script>alert('xss')</script>".to_string();
        let html = render_blog_index(&[p], &configured_settings())
            .unwrap()
            .into_string();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn generate_empty_site() {
        let tmp = TempDir::new().unwrap();
        let report =
            generate(&SiteContent::default(), &Settings::unconfigured(), tmp.path()).unwrap();

        assert_eq!(
            report.pages,
            ["index.html", "blog/index.html", "projects/index.html"]
        );
        let blog = fs::read_to_string(tmp.path().join("blog/index.html")).unwrap();
        assert!(blog.contains(NO_POSTS));
        let home = fs::read_to_string(tmp.path().join("index.html")).unwrap();
        assert!(home.contains(NO_FEATURED));
        assert!(tmp.path().join("sitemap.xml").exists());
        assert_eq!(report.sitemap_urls, sitemap::STATIC_ROUTES.len());
    }

    #[test]
    fn generate_full_site() {
        let tmp = TempDir::new().unwrap();
        let report = generate(&sample_content(), &configured_settings(), tmp.path()).unwrap();

        assert!(report.pages.contains(&"blog/newer/index.html".to_string()));
        assert!(report.pages.contains(&"projects/compass/index.html".to_string()));
        assert_eq!(report.pages.len(), 3 + 2 + 3);

        let post = fs::read_to_string(tmp.path().join("blog/newer/index.html")).unwrap();
        assert!(post.contains("Getting started"));
        let home = fs::read_to_string(tmp.path().join("index.html")).unwrap();
        assert!(home.contains("Project atlas"));
        assert!(home.contains("Project beacon"));
        assert!(!home.contains("Project compass"));
    }

    #[test]
    fn generate_skips_unsafe_slug() {
        let tmp = TempDir::new().unwrap();
        let content = SiteContent {
            posts: vec![post("../escape", None)],
            post_slugs: vec![
                SlugEntry { slug: "../escape".into(), updated_at: None },
                SlugEntry { slug: "has space".into(), updated_at: None },
            ],
            ..SiteContent::default()
        };
        let report = generate(&content, &configured_settings(), tmp.path()).unwrap();
        assert_eq!(report.skipped, ["../escape"]);
        assert_eq!(report.pages.len(), 3);

        let sitemap = fs::read_to_string(tmp.path().join("sitemap.xml")).unwrap();
        assert!(!sitemap.contains("escape"));
        assert!(sitemap.contains("<loc>https://example.com/blog/has%20space</loc>"));
    }
}
