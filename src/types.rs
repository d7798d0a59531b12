//! Content entities read from the content store.
//!
//! Every type here is a read-only projection of a document authored in the
//! studio. Field names follow the JSON produced by the catalog's GROQ
//! projections (camelCase, `_id` for the document id).
//!
//! Absent data is never an error. Missing or `null` strings and lists
//! deserialize to their empty value, and optional references (image, author,
//! SEO) deserialize to `None`. Consumers can always render a document, even a
//! half-written one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Treat `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// URL-safe key, unique within the dataset.
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    /// Unpublished drafts have no timestamp yet.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub excerpt: String,
    /// Only projected by the single-post query.
    #[serde(default)]
    pub body: Option<Vec<Block>>,
    #[serde(default)]
    pub author: Option<PostAuthor>,
    /// Category titles.
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<String>,
    #[serde(default)]
    pub main_image: Option<ImageRef>,
    #[serde(default)]
    pub seo: Option<Seo>,
}

impl BlogPost {
    /// Author display name, whichever form the author field took.
    pub fn author_name(&self) -> Option<&str> {
        self.author
            .as_ref()
            .map(PostAuthor::name)
            .filter(|name| !name.is_empty())
    }

    /// Title for `<title>`, preferring the SEO override.
    pub fn page_title(&self) -> &str {
        self.seo
            .as_ref()
            .and_then(|s| s.title.as_deref())
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.title)
    }
}

/// Post author: either a plain name or a dereferenced author document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostAuthor {
    Name(String),
    Reference(Author),
}

impl PostAuthor {
    pub fn name(&self) -> &str {
        match self {
            PostAuthor::Name(name) => name,
            PostAuthor::Reference(author) => &author.name,
        }
    }
}

/// SEO overrides for a post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Seo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
}

/// A portfolio project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub main_image: Option<ImageRef>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub challenges: Vec<Challenge>,
    #[serde(default)]
    pub development_process: Option<DevelopmentProcess>,
    #[serde(default)]
    pub live_url: Option<String>,
    /// Source repository.
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub featured: Option<bool>,
    /// Explicit sort order, ascending.
    #[serde(default)]
    pub order: Option<i64>,
}

impl Project {
    pub fn is_featured(&self) -> bool {
        self.featured.unwrap_or(false)
    }

    /// Projects without an explicit order sort last.
    pub fn sort_key(&self) -> i64 {
        self.order.unwrap_or(i64::MAX)
    }
}

/// A challenge met while building a project, and how it was solved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    #[serde(default, deserialize_with = "null_as_default")]
    pub challenge: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub solution: String,
}

/// How a project was built, phase by phase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DevelopmentProcess {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phases: Vec<ProcessPhase>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessPhase {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
}

/// An author document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    /// Absent when the author is projected inline into a post.
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default)]
    pub image: Option<ImageRef>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// A category document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Slug plus last-modified time, used for the sitemap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlugEntry {
    pub slug: String,
    #[serde(rename = "_updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Whether `slug` can be used as a single path segment under its section.
pub fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty() && slug != "." && slug != ".." && !slug.contains(['/', '\\'])
}

/// An image field: an asset reference plus editorial text.
///
/// The asset is opaque here; only [`crate::image`] turns it into a URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(default)]
    pub asset: Option<AssetRef>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

impl ImageRef {
    /// Image referencing an asset document id like `image-<hash>-800x600-jpg`.
    pub fn from_asset_id(id: impl Into<String>) -> Self {
        Self {
            asset: Some(AssetRef {
                reference: Some(id.into()),
                ..AssetRef::default()
            }),
            ..Self::default()
        }
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    /// Asset document id, whether the asset was referenced or dereferenced.
    pub fn asset_id(&self) -> Option<&str> {
        let asset = self.asset.as_ref()?;
        asset
            .reference
            .as_deref()
            .or(asset.id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

/// Either a `{_ref}` reference or an expanded `{_id, url}` asset document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetRef {
    #[serde(rename = "_ref", default)]
    pub reference: Option<String>,
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// One block of a rich-text body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum Block {
    #[serde(rename = "block")]
    Text(TextBlock),
    #[serde(rename = "image")]
    Image(ImageRef),
    /// Custom block types this crate does not render.
    #[serde(other)]
    Unknown,
}

/// A paragraph, heading, quote or list item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    #[serde(rename = "_key", default)]
    pub key: String,
    /// `normal`, `h2`, `h3`, `blockquote`, ...
    #[serde(default)]
    pub style: Option<String>,
    /// `bullet` or `number` for list items.
    #[serde(default)]
    pub list_item: Option<String>,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<Span>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mark_defs: Vec<MarkDef>,
}

impl TextBlock {
    pub fn style(&self) -> &str {
        self.style.as_deref().unwrap_or("normal")
    }

    /// Concatenated text of all spans, marks ignored.
    pub fn plain_text(&self) -> String {
        self.children.iter().map(|s| s.text.as_str()).collect()
    }
}

/// A run of text with decorator and annotation marks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Span {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    /// Decorators (`strong`, `em`, `code`) or keys into `mark_defs`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub marks: Vec<String>,
}

/// Annotation referenced from a span's marks, e.g. a link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkDef {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(rename = "_type", default)]
    pub kind: String,
    #[serde(default)]
    pub href: Option<String>,
}
