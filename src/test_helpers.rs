//! Shared test utilities for the folio-content test suite.
//!
//! Builders for content documents in both forms the crate sees them: as the
//! JSON a query returns (`*_json`) and as decoded entities. Entities are
//! built by decoding the JSON, so fixtures always go through the same serde
//! path as real responses.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let client = ContentClient::new(
//!     Arc::new(configured_settings()),
//!     MockTransport::new().with_result("all_posts", json!([post_json("hello")])),
//! );
//! let posts = client.fetch_or_default(&queries::all_posts());
//! assert_eq!(find_post(&posts, "hello").title, "Post hello");
//! ```

use serde_json::{Value, json};

use crate::config::Settings;
use crate::snapshot::SiteContent;
use crate::types::{BlogPost, Project};

// =========================================================================
// Settings
// =========================================================================

/// Settings for a configured store with production caching.
pub fn configured_settings() -> Settings {
    Settings::new("test-project", "test-dataset").with_site_url("https://example.com/")
}

// =========================================================================
// JSON documents, shaped like query results
// =========================================================================

/// A list-projection post with an author name and one category.
pub fn post_json(slug: &str) -> Value {
    json!({
        "_id": format!("post-{slug}"),
        "title": format!("Post {slug}"),
        "slug": slug,
        "publishedAt": "2024-01-15T10:00:00Z",
        "excerpt": format!("About {slug}."),
        "author": "Sam Rivera",
        "categories": ["Engineering"],
        "mainImage": null
    })
}

/// A list-projection project.
pub fn project_json(slug: &str, order: i64, featured: bool) -> Value {
    json!({
        "_id": format!("project-{slug}"),
        "title": format!("Project {slug}"),
        "slug": slug,
        "description": format!("What {slug} does."),
        "techStack": ["Rust"],
        "featured": featured,
        "order": order
    })
}

// =========================================================================
// Decoded entities
// =========================================================================

/// A post published at `published` (RFC 3339), or a draft when `None`.
pub fn post(slug: &str, published: Option<&str>) -> BlogPost {
    let mut value = post_json(slug);
    value["publishedAt"] = published.map_or(Value::Null, |p| json!(p));
    serde_json::from_value(value).unwrap()
}

/// A project with the given sort order (or none) and featured flag.
pub fn project(slug: &str, order: Option<i64>, featured: bool) -> Project {
    let mut value = project_json(slug, 0, featured);
    value["order"] = order.map_or(Value::Null, |o| json!(o));
    serde_json::from_value(value).unwrap()
}

/// A post with a rich body: heading, paragraph with a link, list and image.
pub fn post_with_body(slug: &str) -> BlogPost {
    let mut value = post_json(slug);
    value["author"] = json!({ "name": "Sam Rivera", "role": "Engineer" });
    value["body"] = json!([
        { "_type": "block", "_key": "h", "style": "h2",
          "children": [{ "text": "Getting started" }] },
        { "_type": "block", "_key": "p", "style": "normal",
          "markDefs": [{ "_key": "l1", "_type": "link", "href": "https://www.rust-lang.org" }],
          "children": [
            { "text": "Read " },
            { "text": "the book", "marks": ["l1"] },
            { "text": " twice.", "marks": ["strong"] }
          ] },
        { "_type": "block", "_key": "li1", "listItem": "bullet", "level": 1,
          "children": [{ "text": "first" }] },
        { "_type": "block", "_key": "li2", "listItem": "bullet", "level": 1,
          "children": [{ "text": "second" }] },
        { "_type": "image", "asset": { "_ref": "image-abc123-800x600-jpg" }, "alt": "Diagram" },
        { "_type": "codeSandbox", "_key": "x" }
    ]);
    serde_json::from_value(value).unwrap()
}

/// A project with every long-form field filled in.
pub fn project_with_details(slug: &str) -> Project {
    let mut value = project_json(slug, 1, true);
    value["overview"] = json!("An overview.");
    value["features"] = json!(["Fast", "Small"]);
    value["challenges"] = json!([{ "challenge": "Latency", "solution": "Caching" }]);
    value["developmentProcess"] = json!({
        "summary": "Built in two phases.",
        "phases": [
            { "title": "Prototype", "description": "Spike.", "duration": "2 weeks" },
            { "title": "Launch", "duration": "1 month" }
        ]
    });
    value["liveUrl"] = json!("https://atlas.example.com");
    value["githubUrl"] = json!("https://github.com/example/atlas");
    serde_json::from_value(value).unwrap()
}

/// Site content with two posts and three projects (two featured).
pub fn sample_content() -> SiteContent {
    let posts = vec![
        post("newer", Some("2024-05-01T00:00:00Z")),
        post("older", Some("2023-02-01T00:00:00Z")),
    ];
    let projects = vec![
        project("atlas", Some(1), true),
        project("beacon", Some(2), true),
        project("compass", Some(3), false),
    ];
    SiteContent {
        post_details: posts.iter().map(|p| post_with_body(&p.slug)).collect(),
        project_details: projects
            .iter()
            .map(|p| project_with_details(&p.slug))
            .collect(),
        featured: projects.iter().filter(|p| p.is_featured()).cloned().collect(),
        posts,
        projects,
        ..SiteContent::default()
    }
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find a post by slug. Panics if not found.
pub fn find_post<'a>(posts: &'a [BlogPost], slug: &str) -> &'a BlogPost {
    posts.iter().find(|p| p.slug == slug).unwrap_or_else(|| {
        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        panic!("post '{slug}' not found. Available: {slugs:?}")
    })
}

/// Find a project by slug. Panics if not found.
pub fn find_project<'a>(projects: &'a [Project], slug: &str) -> &'a Project {
    projects.iter().find(|p| p.slug == slug).unwrap_or_else(|| {
        let slugs: Vec<&str> = projects.iter().map(|p| p.slug.as_str()).collect();
        panic!("project '{slug}' not found. Available: {slugs:?}")
    })
}
