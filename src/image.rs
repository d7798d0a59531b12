//! Image asset URLs.
//!
//! Content documents never carry a usable image URL: they hold an asset
//! reference such as `image-a1b2c3-1600x900-jpg`. [`ImageUrlBuilder`] maps that
//! reference to the image CDN, with optional resize and encoding transforms:
//!
//! ```text
//! image-a1b2c3-1600x900-jpg
//!   -> https://cdn.sanity.io/images/<project>/<dataset>/a1b2c3-1600x900.jpg?w=800&fm=webp
//! ```
//!
//! ## Purity
//!
//! The builder is a plain value. Transform calls may come in any order; the
//! query string is always emitted in one canonical order (`w`, `h`, `fit`,
//! `q`, `fm`, `auto`), so the same reference with the same transforms yields
//! the same string during a static build and at request time.
//!
//! ## Failure
//!
//! Building a URL without a configured store is a programming error and
//! yields [`Outcome::Fatal`]. An image field with no asset is normal content
//! and yields [`Outcome::Empty`].

use crate::config::Settings;
use crate::outcome::{ContentError, Outcome};
use crate::types::ImageRef;
use std::fmt;
use std::str::FromStr;

pub const CDN_HOST: &str = "cdn.sanity.io";

/// Output encoding requested from the CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpg,
    Pjpg,
    Png,
    Webp,
}

impl ImageFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageFormat::Jpg => "jpg",
            ImageFormat::Pjpg => "pjpg",
            ImageFormat::Png => "png",
            ImageFormat::Webp => "webp",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(ImageFormat::Jpg),
            "pjpg" => Ok(ImageFormat::Pjpg),
            "png" => Ok(ImageFormat::Png),
            "webp" => Ok(ImageFormat::Webp),
            other => Err(format!("unknown image format '{other}'")),
        }
    }
}

/// How the image is fitted into the requested box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    Clip,
    Crop,
    Fill,
    FillMax,
    Max,
    Scale,
    Min,
}

impl Fit {
    pub fn as_str(self) -> &'static str {
        match self {
            Fit::Clip => "clip",
            Fit::Crop => "crop",
            Fit::Fill => "fill",
            Fit::FillMax => "fillmax",
            Fit::Max => "max",
            Fit::Scale => "scale",
            Fit::Min => "min",
        }
    }
}

impl FromStr for Fit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "clip" => Ok(Fit::Clip),
            "crop" => Ok(Fit::Crop),
            "fill" => Ok(Fit::Fill),
            "fillmax" => Ok(Fit::FillMax),
            "max" => Ok(Fit::Max),
            "scale" => Ok(Fit::Scale),
            "min" => Ok(Fit::Min),
            other => Err(format!("unknown fit mode '{other}'")),
        }
    }
}

/// Encoding quality (0-100). Clamped on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.min(100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

/// Parsed image asset id: `image-<hash>-<width>x<height>-<ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetId {
    pub hash: String,
    pub width: u32,
    pub height: u32,
    pub extension: String,
}

impl AssetId {
    /// File name on the CDN: `<hash>-<w>x<h>.<ext>`.
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}x{}.{}",
            self.hash, self.width, self.height, self.extension
        )
    }

    /// Recover the id from a CDN URL such as
    /// `https://cdn.sanity.io/images/p/d/<hash>-<w>x<h>.<ext>`.
    pub fn from_cdn_url(url: &str) -> Option<Self> {
        let file = url.split(['?', '#']).next()?.rsplit('/').next()?;
        let (stem, ext) = file.rsplit_once('.')?;
        format!("image-{stem}-{ext}").parse().ok()
    }
}

impl FromStr for AssetId {
    type Err = ContentError;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        let invalid = || ContentError::InvalidAssetRef(id.to_string());
        let rest = id.strip_prefix("image-").ok_or_else(invalid)?;
        let (rest, extension) = rest.rsplit_once('-').ok_or_else(invalid)?;
        let (hash, dimensions) = rest.rsplit_once('-').ok_or_else(invalid)?;
        let (width, height) = dimensions.split_once('x').ok_or_else(invalid)?;
        let width: u32 = width.parse().map_err(|_| invalid())?;
        let height: u32 = height.parse().map_err(|_| invalid())?;
        if hash.is_empty() || extension.is_empty() || width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(AssetId {
            hash: hash.to_string(),
            width,
            height,
            extension: extension.to_string(),
        })
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "image-{}-{}x{}-{}",
            self.hash, self.width, self.height, self.extension
        )
    }
}

/// Chainable, order-independent image transform. Terminal call: [`url`](Self::url).
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUrlBuilder {
    base: String,
    asset: AssetId,
    width: Option<u32>,
    height: Option<u32>,
    fit: Option<Fit>,
    quality: Option<Quality>,
    format: Option<ImageFormat>,
    auto_format: bool,
}

impl ImageUrlBuilder {
    /// Start a URL for `image` in the configured store.
    pub fn for_image(settings: &Settings, image: &ImageRef) -> Outcome<Self> {
        let Some(store) = settings.store() else {
            return Outcome::Fatal(ContentError::NotConfigured);
        };
        let asset = match resolve_asset(image) {
            Ok(Some(asset)) => asset,
            Ok(None) => return Outcome::Empty,
            Err(err) => return Outcome::Fatal(err),
        };
        Outcome::Data(Self {
            base: format!(
                "https://{CDN_HOST}/images/{}/{}",
                store.project_id, store.dataset
            ),
            asset,
            width: None,
            height: None,
            fit: None,
            quality: None,
            format: None,
            auto_format: false,
        })
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn fit(mut self, fit: Fit) -> Self {
        self.fit = Some(fit);
        self
    }

    pub fn quality(mut self, quality: u32) -> Self {
        self.quality = Some(Quality::new(quality));
        self
    }

    pub fn format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Let the CDN pick the best format the browser accepts.
    pub fn auto_format(mut self) -> Self {
        self.auto_format = true;
        self
    }

    pub fn asset(&self) -> &AssetId {
        &self.asset
    }

    /// The fully-qualified URL.
    pub fn url(&self) -> String {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(w) = self.width {
            params.push(("w", w.to_string()));
        }
        if let Some(h) = self.height {
            params.push(("h", h.to_string()));
        }
        if let Some(fit) = self.fit {
            params.push(("fit", fit.as_str().to_string()));
        }
        if let Some(q) = self.quality {
            params.push(("q", q.value().to_string()));
        }
        if let Some(fm) = self.format {
            params.push(("fm", fm.as_str().to_string()));
        }
        if self.auto_format {
            params.push(("auto", "format".to_string()));
        }

        let mut url = format!("{}/{}", self.base, self.asset.file_name());
        for (i, (key, value)) in params.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(value);
        }
        url
    }

    /// `srcset` attribute value with one candidate per width.
    ///
    /// Heights scale with each width when a height was set, so the crop's
    /// aspect ratio is kept across candidates.
    pub fn srcset(&self, widths: &[u32]) -> String {
        widths
            .iter()
            .map(|&w| {
                let mut candidate = self.clone().width(w);
                if let (Some(h), Some(base_w)) = (self.height, self.width)
                    && base_w > 0
                {
                    candidate.height = Some(scale(h, w, base_w));
                }
                format!("{} {w}w", candidate.url())
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ImageUrlBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

fn scale(value: u32, numerator: u32, denominator: u32) -> u32 {
    ((u64::from(value) * u64::from(numerator) + u64::from(denominator) / 2) / u64::from(denominator))
        as u32
}

/// Asset id from a reference, an expanded asset document, or its URL.
fn resolve_asset(image: &ImageRef) -> Result<Option<AssetId>, ContentError> {
    if let Some(id) = image.asset_id() {
        return id.parse().map(Some);
    }
    let url = image.asset.as_ref().and_then(|a| a.url.as_deref());
    match url {
        Some(url) => AssetId::from_cdn_url(url)
            .map(Some)
            .ok_or_else(|| ContentError::InvalidAssetRef(url.to_string())),
        None => Ok(None),
    }
}
