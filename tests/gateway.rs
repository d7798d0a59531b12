//! Integration tests for the fetch gateway and caching, through the public API.
//!
//! A scripted transport stands in for the HTTP API: it answers by query name
//! and counts calls, and can be switched to fail every request.

use folio_content::cache::CachingTransport;
use folio_content::client::ContentClient;
use folio_content::config::{Environment, Settings};
use folio_content::outcome::{ContentError, Outcome};
use folio_content::queries;
use folio_content::transport::{QueryRequest, Transport, TransportError};
use folio_content::types::ImageRef;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Default)]
struct ScriptedStore {
    results: HashMap<&'static str, Value>,
    calls: AtomicUsize,
    offline: AtomicBool,
}

impl ScriptedStore {
    fn with(mut self, name: &'static str, result: Value) -> Self {
        self.results.insert(name, result);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }
}

impl Transport for ScriptedStore {
    fn query(&self, request: &QueryRequest<'_>) -> Result<Value, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(TransportError::Status {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }
        self.results
            .get(request.name)
            .cloned()
            .ok_or_else(|| TransportError::Malformed(format!("no result for {}", request.name)))
    }
}

fn settings() -> Arc<Settings> {
    Arc::new(Settings::new("portfolio", "production"))
}

fn posts() -> Value {
    json!([
        { "_id": "p1", "title": "First", "slug": "first", "publishedAt": "2023-05-01T00:00:00Z" },
        { "_id": "p2", "title": "Second", "slug": "second", "publishedAt": "2024-05-01T00:00:00Z",
          "categories": null, "author": "Sam Rivera" }
    ])
}

#[test]
fn blog_lists_posts_newest_first() {
    let client = ContentClient::new(settings(), ScriptedStore::default().with("all_posts", posts()));
    let posts = client.fetch_or_default(&queries::all_posts());
    let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, ["second", "first"]);
    assert!(posts[0].categories.is_empty());
}

#[test]
fn unconfigured_store_never_calls_transport() {
    let client = ContentClient::new(
        Arc::new(Settings::unconfigured()),
        ScriptedStore::default().with("all_posts", posts()),
    );
    assert!(client.fetch(&queries::all_posts()).is_empty());
    assert!(client.fetch(&queries::featured_projects()).is_empty());
    assert_eq!(client.transport().calls(), 0);
}

#[test]
fn network_error_yields_empty_list() {
    let store = ScriptedStore::default().with("all_posts", posts());
    store.go_offline();
    let client = ContentClient::new(settings(), store);
    assert!(client.fetch_or_default(&queries::all_posts()).is_empty());
}

#[test]
fn url_for_fails_loudly_where_fetch_degrades() {
    let client = ContentClient::new(Arc::new(Settings::unconfigured()), ScriptedStore::default());
    let image = ImageRef::from_asset_id("image-0a1b-1200x800-png");

    match client.url_for(&image) {
        Outcome::Fatal(ContentError::NotConfigured) => {}
        other => panic!("expected Fatal(NotConfigured), got {other:?}"),
    }
    assert!(client.fetch(&queries::all_projects()).is_empty());
}

#[test]
fn url_for_is_deterministic() {
    let client = ContentClient::new(settings(), ScriptedStore::default());
    let image = ImageRef::from_asset_id("image-0a1b-1200x800-png");
    let build = || {
        client
            .url_for(&image)
            .into_result()
            .unwrap()
            .unwrap()
            .height(300)
            .width(400)
            .url()
    };
    assert_eq!(build(), build());
    assert_eq!(
        build(),
        "https://cdn.sanity.io/images/portfolio/production/0a1b-1200x800.png?w=400&h=300"
    );
}

#[test]
fn cache_serves_repeat_queries_once() {
    let client = ContentClient::new(
        settings(),
        CachingTransport::new(ScriptedStore::default().with("all_posts", posts())),
    );
    for _ in 0..3 {
        assert_eq!(client.fetch_or_default(&queries::all_posts()).len(), 2);
    }
    assert_eq!(client.transport().inner().calls(), 1);
    assert_eq!(client.transport().stats().hits, 2);
}

#[test]
fn invalidated_entry_is_refetched() {
    let client = ContentClient::new(
        Arc::new(Settings::new("portfolio", "production").with_environment(Environment::Development)),
        CachingTransport::new(ScriptedStore::default().with("all_posts", posts())),
    );
    assert_eq!(client.fetch_or_default(&queries::all_posts()).len(), 2);

    client.transport().inner().go_offline();
    assert_eq!(client.transport().invalidate_tag(queries::TAG_POST), 1);
    assert!(client.fetch_or_default(&queries::all_posts()).is_empty());
    assert_eq!(client.transport().inner().calls(), 2);
}

#[test]
fn single_record_absent_is_none() {
    let client = ContentClient::new(
        settings(),
        ScriptedStore::default().with("project_by_slug", Value::Null),
    );
    assert_eq!(client.fetch_or_default(&queries::project_by_slug("missing")), None);
}

#[test]
fn author_without_name_keeps_post_and_author_list() {
    let post = json!({
        "_id": "p1", "title": "Hello", "slug": "hello-world",
        "author": { "_id": "a2", "name": null, "slug": null }
    });
    let client = ContentClient::new(
        settings(),
        ScriptedStore::default()
            .with("post_by_slug", post)
            .with("all_authors", json!([{ "_id": "a1", "name": "Sam" }, { "_id": "a2", "name": null }])),
    );

    let post = client
        .fetch_or_default(&queries::post_by_slug("hello-world"))
        .expect("post should decode");
    assert_eq!(post.title, "Hello");
    assert_eq!(post.author_name(), None);
    assert_eq!(client.fetch_or_default(&queries::all_authors()).len(), 2);
}
