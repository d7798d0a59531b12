//! The result of asking the content layer for something.
//!
//! Content operations end in one of three ways, and callers must pick how to
//! handle each one:
//!
//! | Variant | Meaning | Typical handling |
//! |---|---|---|
//! | [`Outcome::Data`] | The value was produced | render it |
//! | [`Outcome::Empty`] | Nothing to show (store unconfigured, fetch failed, no asset) | render the empty state |
//! | [`Outcome::Fatal`] | A code path ran that must not run | propagate with `into_result()?` |
//!
//! [`ContentClient::fetch`](crate::client::ContentClient::fetch) only ever
//! produces `Data` or `Empty`: a broken content store must not take the site
//! down. [`ImageUrlBuilder::for_image`](crate::image::ImageUrlBuilder::for_image)
//! produces `Fatal` when asked for a URL without a configured store, because
//! that means content reached a page without passing through a configured
//! gateway.
//!
//! `Empty` carries no shape. A list query collapses it to `vec![]` and a
//! single-record query collapses it to `None` through
//! [`Outcome::unwrap_or_default`], so an absent post is never confused with
//! an empty list.

use crate::transport::TransportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("content store is not configured (set SANITY_PROJECT_ID and SANITY_DATASET)")]
    NotConfigured,
    #[error("invalid image asset reference: {0}")]
    InvalidAssetRef(String),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("response did not match the expected shape: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Three-way result of a content operation. See the [module docs](self).
#[derive(Debug)]
#[must_use]
pub enum Outcome<T> {
    Data(T),
    Empty,
    Fatal(ContentError),
}

impl<T> Outcome<T> {
    pub fn is_data(&self) -> bool {
        matches!(self, Outcome::Data(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Outcome::Empty)
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Outcome::Fatal(_))
    }

    /// The value, if there is one.
    pub fn data(self) -> Option<T> {
        match self {
            Outcome::Data(value) => Some(value),
            Outcome::Empty | Outcome::Fatal(_) => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Data(value) => Outcome::Data(f(value)),
            Outcome::Empty => Outcome::Empty,
            Outcome::Fatal(err) => Outcome::Fatal(err),
        }
    }

    /// Hard failures become `Err`, soft ones become `Ok(None)`.
    pub fn into_result(self) -> Result<Option<T>, ContentError> {
        match self {
            Outcome::Data(value) => Ok(Some(value)),
            Outcome::Empty => Ok(None),
            Outcome::Fatal(err) => Err(err),
        }
    }
}

impl<T: Default> Outcome<T> {
    /// Collapse to the shape's empty value: `[]` for lists, `None` for
    /// single records.
    ///
    /// Only for outcomes that cannot be `Fatal`, such as fetch results. A
    /// `Fatal` outcome is collapsed too, so use [`Outcome::into_result`]
    /// wherever `Fatal` is possible.
    pub fn unwrap_or_default(self) -> T {
        self.data().unwrap_or_default()
    }
}

impl<T> From<Result<T, ContentError>> for Outcome<T> {
    fn from(result: Result<T, ContentError>) -> Self {
        match result {
            Ok(value) => Outcome::Data(value),
            Err(err) => Outcome::Fatal(err),
        }
    }
}
