//! The fetch gateway.
//!
//! [`ContentClient`] is the one way content gets into the site. It pairs the
//! resolved [`Settings`] with a [`Transport`] and runs catalog queries:
//!
//! ```text
//! ContentQuery<T> ──► fetch ──► Transport::query ──► JSON ──► T ──► normalize ──► Outcome<T>
//! ```
//!
//! `fetch` never fails hard. With no store configured it returns
//! [`Outcome::Empty`] without touching the transport; a transport or decode
//! failure is logged and also becomes `Empty`. Pages render their empty state
//! instead of an error page.
//!
//! Each request carries the revalidation window of the current
//! [`Environment`](crate::config::Environment) and the query's invalidation
//! tags, for whichever caching layer sits behind the transport.

use crate::config::Settings;
use crate::image::ImageUrlBuilder;
use crate::outcome::{ContentError, Outcome};
use crate::queries::ContentQuery;
use crate::transport::{CachePolicy, HttpTransport, QueryRequest, Transport, TransportError};
use crate::types::ImageRef;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Content gateway over a transport.
pub struct ContentClient<T = HttpTransport> {
    settings: Arc<Settings>,
    transport: T,
}

impl ContentClient<HttpTransport> {
    /// Gateway over the HTTP query API.
    pub fn from_settings(settings: Arc<Settings>) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(Arc::clone(&settings))?;
        Ok(Self::new(settings, transport))
    }
}

impl<T: Transport> ContentClient<T> {
    pub fn new(settings: Arc<Settings>, transport: T) -> Self {
        if !settings.is_configured() {
            warn!("content store not configured; pages will render empty states");
        }
        Self {
            settings,
            transport,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_configured(&self) -> bool {
        self.settings.is_configured()
    }

    /// Run a catalog query. Never returns [`Outcome::Fatal`].
    pub fn fetch<R: DeserializeOwned>(&self, query: &ContentQuery<R>) -> Outcome<R> {
        if !self.settings.is_configured() {
            warn!(query = query.name(), "content store not configured, skipping fetch");
            return Outcome::Empty;
        }

        let request = QueryRequest {
            name: query.name(),
            text: query.text(),
            params: query.params(),
            cache: CachePolicy {
                revalidate: self.settings.environment().revalidate(),
                tags: query.tags(),
            },
        };

        match self.run(&request) {
            Ok(value) => {
                debug!(query = query.name(), "fetched");
                Outcome::Data(query.finish(value))
            }
            Err(err) => {
                error!(query = query.name(), error = %err, "content fetch failed");
                Outcome::Empty
            }
        }
    }

    /// Like [`fetch`](Self::fetch), collapsed to the shape's empty value.
    pub fn fetch_or_default<R: DeserializeOwned + Default>(&self, query: &ContentQuery<R>) -> R {
        self.fetch(query).unwrap_or_default()
    }

    /// Image URL builder for `image` in this gateway's store.
    pub fn url_for(&self, image: &ImageRef) -> Outcome<ImageUrlBuilder> {
        ImageUrlBuilder::for_image(&self.settings, image)
    }

    fn run<R: DeserializeOwned>(&self, request: &QueryRequest<'_>) -> Result<R, ContentError> {
        let value = self.transport.query(request)?;
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use crate::queries;
    use crate::test_helpers::{configured_settings, post_json, project_json};
    use crate::transport::tests::MockTransport;
    use serde_json::json;
    use std::time::Duration;

    fn client(transport: MockTransport) -> ContentClient<MockTransport> {
        ContentClient::new(Arc::new(configured_settings()), transport)
    }

    #[test]
    fn unconfigured_fetch_is_empty_without_network() {
        let client = ContentClient::new(
            Arc::new(Settings::unconfigured()),
            MockTransport::new().with_result("all_posts", json!([post_json("a")])),
        );
        assert!(client.fetch(&queries::all_posts()).is_empty());
        assert!(client.fetch(&queries::post_by_slug("a")).is_empty());
        assert_eq!(client.transport().call_count(), 0);
    }

    #[test]
    fn unconfigured_lists_collapse_to_empty_vec() {
        let client = ContentClient::new(Arc::new(Settings::unconfigured()), MockTransport::new());
        assert!(client.fetch_or_default(&queries::all_projects()).is_empty());
        assert_eq!(client.fetch_or_default(&queries::project_by_slug("x")), None);
    }

    #[test]
    fn post_by_slug_with_expanded_author() {
        let client = client(MockTransport::new().with_result(
            "post_by_slug",
            json!({
                "_id": "post-1",
                "title": "Hello World",
                "slug": "hello-world",
                "publishedAt": "2024-03-01T09:00:00Z",
                "author": { "_id": "author-1", "name": "Sam Rivera", "role": "Engineer" },
                "categories": ["Rust"],
                "body": [
                    { "_type": "block", "_key": "k1", "style": "normal",
                      "children": [{ "text": "Hi there" }] }
                ]
            }),
        ));

        let post = client
            .fetch(&queries::post_by_slug("hello-world"))
            .unwrap_or_default()
            .unwrap();
        assert_eq!(post.title, "Hello World");
        assert_eq!(post.author_name(), Some("Sam Rivera"));

        let recorded = client.transport().recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(
            recorded[0].params,
            [("slug".to_string(), "hello-world".to_string())]
        );
        assert_eq!(recorded[0].tags, ["post", "post:hello-world"]);
    }

    #[test]
    fn missing_record_is_none_not_error() {
        let client = client(MockTransport::new().with_result("post_by_slug", json!(null)));
        let outcome = client.fetch(&queries::post_by_slug("nope"));
        assert!(matches!(outcome, Outcome::Data(None)));
    }

    #[test]
    fn featured_projects_capped_at_six() {
        let projects: Vec<_> = (1..=8).map(|n| project_json(&format!("p{n}"), n, true)).collect();
        let client = client(
            MockTransport::new().with_result("featured_projects", json!(projects)),
        );
        let featured = client.fetch_or_default(&queries::featured_projects());
        assert_eq!(featured.len(), 6);
        assert_eq!(featured[0].slug, "p1");
        assert!(featured.iter().all(|p| p.is_featured()));
    }

    #[test]
    fn transport_failure_degrades_to_empty() {
        let client = client(MockTransport::new().with_failure("all_posts", "connection reset"));
        let outcome = client.fetch(&queries::all_posts());
        assert!(outcome.is_empty());
        assert!(client.fetch_or_default(&queries::all_posts()).is_empty());
    }

    #[test]
    fn wrong_shape_degrades_to_empty() {
        let client = client(MockTransport::new().with_result("all_posts", json!({ "not": "a list" })));
        assert!(client.fetch(&queries::all_posts()).is_empty());
    }

    #[test]
    fn posts_come_back_newest_first() {
        let mut old = post_json("old");
        old["publishedAt"] = json!("2022-01-01T00:00:00Z");
        let mut new = post_json("new");
        new["publishedAt"] = json!("2024-01-01T00:00:00Z");
        let client = client(MockTransport::new().with_result("all_posts", json!([old, new])));
        let posts = client.fetch_or_default(&queries::all_posts());
        assert_eq!(posts[0].slug, "new");
        assert_eq!(posts[1].slug, "old");
    }

    #[test]
    fn revalidate_window_follows_environment() {
        let dev = ContentClient::new(
            Arc::new(configured_settings().with_environment(Environment::Development)),
            MockTransport::new().with_result("all_authors", json!([])),
        );
        let _ = dev.fetch(&queries::all_authors());
        assert_eq!(
            dev.transport().recorded()[0].revalidate,
            Duration::from_secs(30)
        );

        let prod = client(MockTransport::new().with_result("all_authors", json!([])));
        let _ = prod.fetch(&queries::all_authors());
        assert_eq!(
            prod.transport().recorded()[0].revalidate,
            Duration::from_secs(3600)
        );
    }

    #[test]
    fn url_for_is_fatal_when_unconfigured() {
        let client = ContentClient::new(Arc::new(Settings::unconfigured()), MockTransport::new());
        let image = ImageRef::from_asset_id("image-abc-10x10-png");
        assert!(client.url_for(&image).is_fatal());
        // The same client's fetch degrades instead.
        assert!(client.fetch(&queries::all_posts()).is_empty());
    }

    #[test]
    fn url_for_uses_store() {
        let client = client(MockTransport::new());
        let url = client
            .url_for(&ImageRef::from_asset_id("image-abc-10x10-png"))
            .data()
            .unwrap()
            .width(5)
            .url();
        assert!(url.contains("/images/test-project/test-dataset/abc-10x10.png"));
    }
}
