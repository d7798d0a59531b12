//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Output is **information-centric**: every entity is shown by positional
//! index and title, with slug, dates and other fields as indented context
//! lines. The listing reads as a content inventory while still giving the
//! slug needed for `post <slug>` or `project <slug>`.
//!
//! # Output Format
//!
//! ## Posts
//!
//! ```text
//! Posts
//! 001 Hello World (2024-03-01)
//!     Slug: hello-world
//!     Author: Sam Rivera
//!     Categories: Rust, Web
//! ```
//!
//! ## Projects
//!
//! ```text
//! Projects
//! 001 Atlas [featured]
//!     Slug: atlas
//!     Order: 1
//!     Stack: Rust, Postgres
//! ```
//!
//! ## Build
//!
//! ```text
//! index.html
//! blog/index.html
//! blog/hello-world/index.html
//!
//! Generated 3 pages, 4 sitemap URLs in dist
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::config::Settings;
use crate::generate::GenerateReport;
use crate::snapshot::SiteContent;
use crate::types::{Block, BlogPost, Project};

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Indented `Label: value` context line.
fn context(label: &str, value: &str) -> String {
    format!("{}{}: {}", indent(1), label, value)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

fn post_header(index: usize, post: &BlogPost) -> String {
    match &post.published_at {
        Some(date) => format!(
            "{} {} ({})",
            format_index(index),
            post.title,
            date.format("%Y-%m-%d")
        ),
        None => format!("{} {} (draft)", format_index(index), post.title),
    }
}

fn project_header(index: usize, project: &Project) -> String {
    if project.is_featured() {
        format!("{} {} [featured]", format_index(index), project.title)
    } else {
        format!("{} {}", format_index(index), project.title)
    }
}

// ============================================================================
// Posts
// ============================================================================

pub fn format_posts(posts: &[BlogPost]) -> Vec<String> {
    let mut lines = vec!["Posts".to_string()];
    if posts.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
        return lines;
    }
    for (i, post) in posts.iter().enumerate() {
        lines.push(post_header(i + 1, post));
        lines.push(context("Slug", &post.slug));
        if let Some(author) = post.author_name() {
            lines.push(context("Author", author));
        }
        if !post.categories.is_empty() {
            lines.push(context("Categories", &post.categories.join(", ")));
        }
    }
    lines
}

pub fn print_posts(posts: &[BlogPost]) {
    for line in format_posts(posts) {
        println!("{line}");
    }
}

/// Full view of one post, or a not-found line.
pub fn format_post(slug: &str, post: Option<&BlogPost>) -> Vec<String> {
    let Some(post) = post else {
        return vec![format!("No post with slug '{slug}'")];
    };
    let mut lines = vec![post_header(1, post)];
    lines.push(context("Slug", &post.slug));
    lines.push(context("Id", &post.id));
    if let Some(author) = post.author_name() {
        lines.push(context("Author", author));
    }
    if !post.categories.is_empty() {
        lines.push(context("Categories", &post.categories.join(", ")));
    }
    if !post.excerpt.is_empty() {
        lines.push(context("Excerpt", &truncate_desc(&post.excerpt, 80)));
    }
    if let Some(seo) = &post.seo
        && let Some(title) = &seo.title
    {
        lines.push(context("SEO title", title));
    }
    if let Some(body) = &post.body {
        let images = body.iter().filter(|b| matches!(b, Block::Image(_))).count();
        lines.push(context(
            "Body",
            &format!("{} blocks, {} images", body.len(), images),
        ));
    }
    lines
}

pub fn print_post(slug: &str, post: Option<&BlogPost>) {
    for line in format_post(slug, post) {
        println!("{line}");
    }
}

// ============================================================================
// Projects
// ============================================================================

/// List of projects under `heading` (`Projects`, `Featured`).
pub fn format_projects(heading: &str, projects: &[Project]) -> Vec<String> {
    let mut lines = vec![heading.to_string()];
    if projects.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
        return lines;
    }
    for (i, project) in projects.iter().enumerate() {
        lines.push(project_header(i + 1, project));
        lines.push(context("Slug", &project.slug));
        if let Some(order) = project.order {
            lines.push(context("Order", &order.to_string()));
        }
        if !project.tech_stack.is_empty() {
            lines.push(context("Stack", &project.tech_stack.join(", ")));
        }
    }
    lines
}

pub fn print_projects(heading: &str, projects: &[Project]) {
    for line in format_projects(heading, projects) {
        println!("{line}");
    }
}

/// Full view of one project, or a not-found line.
pub fn format_project(slug: &str, project: Option<&Project>) -> Vec<String> {
    let Some(project) = project else {
        return vec![format!("No project with slug '{slug}'")];
    };
    let mut lines = vec![project_header(1, project)];
    if let Some(subtitle) = &project.subtitle {
        lines.push(context("Subtitle", subtitle));
    }
    lines.push(context("Slug", &project.slug));
    if !project.tech_stack.is_empty() {
        lines.push(context("Stack", &project.tech_stack.join(", ")));
    }
    if let Some(url) = &project.live_url {
        lines.push(context("Live", url));
    }
    if let Some(url) = &project.github_url {
        lines.push(context("Source", url));
    }
    if !project.features.is_empty() {
        lines.push(context("Features", &project.features.len().to_string()));
    }
    if !project.challenges.is_empty() {
        lines.push(context("Challenges", &project.challenges.len().to_string()));
    }
    if let Some(process) = &project.development_process {
        let phases: Vec<&str> = process.phases.iter().map(|p| p.title.as_str()).collect();
        lines.push(context("Process", &phases.join(" → ")));
    }
    lines
}

pub fn print_project(slug: &str, project: Option<&Project>) {
    for line in format_project(slug, project) {
        println!("{line}");
    }
}

// ============================================================================
// Check
// ============================================================================

/// Settings summary, plus what a probe fetch found when the store is configured.
pub fn format_check(settings: &Settings, probe: Option<&SiteContent>) -> Vec<String> {
    let mut lines = vec!["Content store".to_string()];
    match settings.store() {
        Some(store) => {
            lines.push(context("Project", store.project_id));
            lines.push(context("Dataset", store.dataset));
        }
        None => {
            lines.push(context("Status", "not configured (pages render empty states)"));
        }
    }
    lines.push(context("API version", settings.api_version()));
    lines.push(context(
        "Endpoint",
        if settings.use_cdn() { "cdn" } else { "live api" },
    ));
    lines.push(context(
        "Token",
        if settings.api_token().is_some() { "set" } else { "not set" },
    ));
    lines.push(context(
        "Environment",
        &format!(
            "{} (revalidate {}s)",
            settings.environment(),
            settings.environment().revalidate().as_secs()
        ),
    ));
    lines.push(context("Site URL", settings.site_url()));

    if let Some(content) = probe {
        lines.push(String::new());
        lines.push("Content".to_string());
        lines.push(context("Posts", &content.posts.len().to_string()));
        lines.push(context("Projects", &content.projects.len().to_string()));
        lines.push(context("Featured", &content.featured.len().to_string()));
        lines.push(context("Authors", &content.authors.len().to_string()));
        lines.push(context("Categories", &content.categories.len().to_string()));
    }
    lines
}

pub fn print_check(settings: &Settings, probe: Option<&SiteContent>) {
    for line in format_check(settings, probe) {
        println!("{line}");
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_generate_report(report: &GenerateReport) -> Vec<String> {
    let mut lines: Vec<String> = report.pages.clone();
    for slug in &report.skipped {
        lines.push(format!("skipped '{slug}' (unusable slug)"));
    }
    lines.push(String::new());
    lines.push(format!(
        "Generated {} page{}, {} sitemap URL{} in {}",
        report.pages.len(),
        if report.pages.len() == 1 { "" } else { "s" },
        report.sitemap_urls,
        if report.sitemap_urls == 1 { "" } else { "s" },
        report.output_dir.display()
    ));
    lines
}

pub fn print_generate_report(report: &GenerateReport) {
    for line in format_generate_report(report) {
        println!("{line}");
    }
}
