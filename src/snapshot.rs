//! Everything the site shows, fetched in one pass.
//!
//! [`load`] runs the list queries side by side with `rayon::join`, then
//! fetches each post and project in full with `par_iter`. Every query goes
//! through [`ContentClient::fetch`], so a failing or unconfigured store gives
//! a [`SiteContent`] with empty lists rather than an error.

use crate::client::ContentClient;
use crate::queries;
use crate::transport::Transport;
use crate::types::{Author, BlogPost, Category, Project, SlugEntry};
use rayon::prelude::*;
use tracing::info;

/// A point-in-time copy of the site's content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteContent {
    /// List projections, newest first.
    pub posts: Vec<BlogPost>,
    /// Full posts (with body), in `posts` order.
    pub post_details: Vec<BlogPost>,
    /// List projections, by sort order.
    pub projects: Vec<Project>,
    /// Full projects, in `projects` order.
    pub project_details: Vec<Project>,
    pub featured: Vec<Project>,
    pub authors: Vec<Author>,
    pub categories: Vec<Category>,
    pub post_slugs: Vec<SlugEntry>,
    pub project_slugs: Vec<SlugEntry>,
}

impl SiteContent {
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty() && self.projects.is_empty()
    }

    /// Full post for `slug`, falling back to its list projection.
    pub fn post(&self, slug: &str) -> Option<&BlogPost> {
        self.post_details
            .iter()
            .chain(&self.posts)
            .find(|p| p.slug == slug)
    }

    /// Full project for `slug`, falling back to its list projection.
    pub fn project(&self, slug: &str) -> Option<&Project> {
        self.project_details
            .iter()
            .chain(&self.projects)
            .find(|p| p.slug == slug)
    }
}

/// Fetch all site content.
pub fn load<T: Transport>(client: &ContentClient<T>) -> SiteContent {
    let ((posts, projects), ((featured, authors), (categories, (post_slugs, project_slugs)))) =
        rayon::join(
            || {
                rayon::join(
                    || client.fetch_or_default(&queries::all_posts()),
                    || client.fetch_or_default(&queries::all_projects()),
                )
            },
            || {
                rayon::join(
                    || {
                        rayon::join(
                            || client.fetch_or_default(&queries::featured_projects()),
                            || client.fetch_or_default(&queries::all_authors()),
                        )
                    },
                    || {
                        rayon::join(
                            || client.fetch_or_default(&queries::all_categories()),
                            || {
                                rayon::join(
                                    || client.fetch_or_default(&queries::post_slugs()),
                                    || client.fetch_or_default(&queries::project_slugs()),
                                )
                            },
                        )
                    },
                )
            },
        );

    let (post_details, project_details) = rayon::join(
        || {
            posts
                .par_iter()
                .filter_map(|p| client.fetch_or_default(&queries::post_by_slug(&p.slug)))
                .collect::<Vec<_>>()
        },
        || {
            projects
                .par_iter()
                .filter_map(|p| client.fetch_or_default(&queries::project_by_slug(&p.slug)))
                .collect::<Vec<_>>()
        },
    );

    info!(
        posts = posts.len(),
        projects = projects.len(),
        featured = featured.len(),
        "content loaded"
    );

    SiteContent {
        posts,
        post_details,
        projects,
        project_details,
        featured,
        authors,
        categories,
        post_slugs,
        project_slugs,
    }
}
