//! The query catalog.
//!
//! Every read the site performs is one of the functions below. Each returns a
//! [`ContentQuery`] typed by the shape its result deserializes into, so the
//! gateway can decode responses without the caller naming a type.
//!
//! | Query | Parameters | Result |
//! |---|---|---|
//! | [`all_posts`] | none | `Vec<BlogPost>`, newest first |
//! | [`post_by_slug`] | `slug` | `Option<BlogPost>` with body and expanded author |
//! | [`all_projects`] | none | `Vec<Project>`, by `order` ascending |
//! | [`featured_projects`] | none | at most 6 featured `Project`s, by `order` |
//! | [`project_by_slug`] | `slug` | `Option<Project>` with long-form fields |
//! | [`all_authors`] | none | `Vec<Author>` |
//! | [`all_categories`] | none | `Vec<Category>` |
//! | [`post_slugs`], [`project_slugs`] | none | `Vec<SlugEntry>` for the sitemap |
//!
//! ## Trusted Text, Untrusted Values
//!
//! Query text is `&'static str`: it can only come from this module. Parameter
//! values (a slug from a URL, say) travel separately and are sent as encoded
//! `$name` request parameters. They are never spliced into the text.
//!
//! ## Ordering Contract
//!
//! The GROQ text orders and limits results on the server. List queries also
//! carry a normalizer that re-applies the same contract locally (stable sort,
//! featured filter and limit), so consumers can rely on it whatever the
//! store returned.

use crate::types::{Author, BlogPost, Category, Project, SlugEntry};
use std::collections::BTreeMap;
use std::fmt;

/// Maximum number of projects on the home page.
pub const FEATURED_LIMIT: usize = 6;

pub const TAG_POST: &str = "post";
pub const TAG_PROJECT: &str = "project";
pub const TAG_AUTHOR: &str = "author";
pub const TAG_CATEGORY: &str = "category";

const POSTS: &str = r#"*[_type == "post" && defined(slug.current)] | order(publishedAt desc) {
  _id,
  title,
  "slug": slug.current,
  publishedAt,
  excerpt,
  "author": author->name,
  "categories": categories[]->title,
  mainImage
}"#;

const POST_BY_SLUG: &str = r#"*[_type == "post" && slug.current == $slug][0] {
  _id,
  title,
  "slug": slug.current,
  publishedAt,
  excerpt,
  body,
  "author": author->{ _id, name, "slug": slug.current, image, bio, role },
  "categories": categories[]->title,
  mainImage,
  seo
}"#;

const PROJECTS: &str = r#"*[_type == "project" && defined(slug.current)] | order(order asc) {
  _id,
  title,
  "slug": slug.current,
  subtitle,
  description,
  techStack,
  mainImage,
  liveUrl,
  githubUrl,
  featured,
  order
}"#;

const FEATURED_PROJECTS: &str = r#"*[_type == "project" && featured == true] | order(order asc) [0...6] {
  _id,
  title,
  "slug": slug.current,
  subtitle,
  description,
  techStack,
  mainImage,
  liveUrl,
  githubUrl,
  featured,
  order
}"#;

const PROJECT_BY_SLUG: &str = r#"*[_type == "project" && slug.current == $slug][0] {
  _id,
  title,
  "slug": slug.current,
  subtitle,
  description,
  techStack,
  mainImage,
  overview,
  features,
  challenges[]{ challenge, solution },
  developmentProcess{ summary, phases[]{ title, description, duration } },
  liveUrl,
  githubUrl,
  featured,
  order
}"#;

const AUTHORS: &str = r#"*[_type == "author"] | order(name asc) {
  _id,
  name,
  "slug": slug.current,
  image,
  bio,
  role
}"#;

const CATEGORIES: &str = r#"*[_type == "category"] | order(title asc) {
  _id,
  title,
  "slug": slug.current,
  description
}"#;

const POST_SLUGS: &str =
    r#"*[_type == "post" && defined(slug.current)] { "slug": slug.current, _updatedAt }"#;

const PROJECT_SLUGS: &str =
    r#"*[_type == "project" && defined(slug.current)] { "slug": slug.current, _updatedAt }"#;

/// A named, parameterized, read-only query whose result decodes into `T`.
pub struct ContentQuery<T> {
    name: &'static str,
    text: &'static str,
    params: BTreeMap<&'static str, String>,
    tags: Vec<String>,
    normalize: Option<fn(&mut T)>,
}

impl<T> ContentQuery<T> {
    pub fn new(name: &'static str, text: &'static str) -> Self {
        Self {
            name,
            text,
            params: BTreeMap::new(),
            tags: Vec::new(),
            normalize: None,
        }
    }

    /// Bind `$name` to a string value.
    pub fn param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.params.insert(name, value.into());
        self
    }

    /// Attach an invalidation tag to the cached result.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Post-process successful results.
    pub fn normalize(mut self, f: fn(&mut T)) -> Self {
        self.normalize = Some(f);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn text(&self) -> &'static str {
        self.text
    }

    pub fn params(&self) -> &BTreeMap<&'static str, String> {
        &self.params
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub(crate) fn finish(&self, mut value: T) -> T {
        if let Some(f) = self.normalize {
            f(&mut value);
        }
        value
    }
}

impl<T> Clone for ContentQuery<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            text: self.text,
            params: self.params.clone(),
            tags: self.tags.clone(),
            normalize: self.normalize,
        }
    }
}

impl<T> fmt::Debug for ContentQuery<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentQuery")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Catalog
// =============================================================================

pub fn all_posts() -> ContentQuery<Vec<BlogPost>> {
    ContentQuery::new("all_posts", POSTS)
        .tag(TAG_POST)
        .normalize(newest_first)
}

pub fn post_by_slug(slug: &str) -> ContentQuery<Option<BlogPost>> {
    ContentQuery::new("post_by_slug", POST_BY_SLUG)
        .param("slug", slug)
        .tag(TAG_POST)
        .tag(format!("{TAG_POST}:{slug}"))
}

pub fn all_projects() -> ContentQuery<Vec<Project>> {
    ContentQuery::new("all_projects", PROJECTS)
        .tag(TAG_PROJECT)
        .normalize(by_sort_order)
}

pub fn featured_projects() -> ContentQuery<Vec<Project>> {
    ContentQuery::new("featured_projects", FEATURED_PROJECTS)
        .tag(TAG_PROJECT)
        .normalize(featured_only)
}

pub fn project_by_slug(slug: &str) -> ContentQuery<Option<Project>> {
    ContentQuery::new("project_by_slug", PROJECT_BY_SLUG)
        .param("slug", slug)
        .tag(TAG_PROJECT)
        .tag(format!("{TAG_PROJECT}:{slug}"))
}

pub fn all_authors() -> ContentQuery<Vec<Author>> {
    ContentQuery::new("all_authors", AUTHORS).tag(TAG_AUTHOR)
}

pub fn all_categories() -> ContentQuery<Vec<Category>> {
    ContentQuery::new("all_categories", CATEGORIES).tag(TAG_CATEGORY)
}

pub fn post_slugs() -> ContentQuery<Vec<SlugEntry>> {
    ContentQuery::new("post_slugs", POST_SLUGS).tag(TAG_POST)
}

pub fn project_slugs() -> ContentQuery<Vec<SlugEntry>> {
    ContentQuery::new("project_slugs", PROJECT_SLUGS).tag(TAG_PROJECT)
}

// =============================================================================
// Normalizers
// =============================================================================

/// Newest publication first; undated drafts last.
fn newest_first(posts: &mut Vec<BlogPost>) {
    posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

fn by_sort_order(projects: &mut Vec<Project>) {
    projects.sort_by_key(Project::sort_key);
}

fn featured_only(projects: &mut Vec<Project>) {
    projects.retain(Project::is_featured);
    by_sort_order(projects);
    projects.truncate(FEATURED_LIMIT);
}
