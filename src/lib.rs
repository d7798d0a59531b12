//! # Folio Content
//!
//! The content layer of a portfolio site whose posts and projects live in a
//! Sanity dataset. It turns the external store into typed Rust values, keeps
//! the site working when the store is missing or down, and builds image CDN
//! URLs.
//!
//! # Architecture: One Gateway
//!
//! Every read goes through [`client::ContentClient::fetch`] with a query from
//! the [`queries`] catalog:
//!
//! ```text
//! Settings ──► ContentClient ──► Transport (HTTP, optionally cached) ──► Sanity
//!                   │
//!                   └──► Outcome<T>  (Data | Empty | Fatal)
//! ```
//!
//! Consumers ([`snapshot`], [`generate`], [`sitemap`], the CLI) never see the
//! network. They get data or an empty value and render accordingly.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Environment variables → immutable `Settings`, validation, `.env` template |
//! | [`types`] | Content entities: `BlogPost`, `Project`, `Author`, `Category`, `ImageRef`, rich-text blocks |
//! | [`outcome`] | `Outcome<T>` three-way result and `ContentError` |
//! | [`queries`] | The query catalog: named GROQ queries typed by result shape |
//! | [`transport`] | `Transport` trait and the HTTP implementation |
//! | [`cache`] | `CachingTransport`: revalidation windows, tag invalidation, expiry eviction |
//! | [`client`] | `ContentClient`: the fetch gateway and `url_for` |
//! | [`image`] | `ImageUrlBuilder`: asset reference → CDN URL with transforms |
//! | [`snapshot`] | Concurrent load of everything the site shows |
//! | [`generate`] | Static HTML for the blog and projects sections using Maud |
//! | [`sitemap`] | `sitemap.xml` from static routes and content slugs |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Soft and Hard Failures
//!
//! A content store that is unconfigured, unreachable or returns garbage must
//! not take the site down, so [`client::ContentClient::fetch`] turns all of
//! those into [`outcome::Outcome::Empty`] and logs them. Building an image
//! URL without a configured store is different: content can only carry an
//! image after a successful fetch, so reaching that point unconfigured is a
//! bug, and [`image::ImageUrlBuilder::for_image`] returns
//! [`outcome::Outcome::Fatal`]. Both live on one result type, so each call
//! site states which failures it absorbs.
//!
//! ## Configuration as a Value
//!
//! [`config::Settings`] is resolved once and passed in. Nothing below `main`
//! reads the environment, so tests build any configuration they need with
//! [`config::Settings::new`] or [`config::Settings::from_lookup`].
//!
//! ## Trusted Query Text
//!
//! Query text is `&'static str` and only exists in [`queries`]. Runtime
//! values such as slugs travel as encoded `$name` parameters.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/): malformed markup
//! is a compile error and all interpolation is escaped, which matters when
//! every string on the page comes from an external editor.

pub mod cache;
pub mod client;
pub mod config;
pub mod generate;
pub mod image;
pub mod outcome;
pub mod output;
pub mod queries;
pub mod sitemap;
pub mod snapshot;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
