//! Content store configuration.
//!
//! All settings come from the process environment and are resolved exactly
//! once, at startup, into an immutable [`Settings`] value. The rest of the
//! crate never reads the environment: the gateway, the image URL builder and
//! the page generator receive `Settings` (usually behind an `Arc`).
//!
//! ## Environment Variables
//!
//! ```text
//! SANITY_PROJECT_ID    Content store project id             (required for fetching)
//! SANITY_DATASET       Dataset name, e.g. "production"      (required for fetching)
//! SANITY_API_TOKEN     Read token; omit for public datasets
//! SANITY_API_VERSION   Dated API version   (default "v2024-01-01")
//! SANITY_USE_CDN       Query the API CDN   (default true; ignored with a token)
//! SANITY_TIMEOUT_SECS  Request timeout     (default 10)
//! SITE_URL             Public site origin  (default "http://localhost:3000")
//! FOLIO_ENV            development | production (default production)
//! ```
//!
//! ## Degraded Mode
//!
//! When either the project id or the dataset is missing (or blank), the
//! settings are still valid but [`Settings::is_configured`] is `false`. The
//! site then builds with empty content sections instead of failing, which is
//! what preview and CI builds without credentials need.
//!
//! Values that are present but malformed are rejected with
//! [`ConfigError::Validation`] to catch typos early.

use chrono::NaiveDate;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub const ENV_PROJECT_ID: &str = "SANITY_PROJECT_ID";
pub const ENV_DATASET: &str = "SANITY_DATASET";
pub const ENV_API_TOKEN: &str = "SANITY_API_TOKEN";
pub const ENV_API_VERSION: &str = "SANITY_API_VERSION";
pub const ENV_USE_CDN: &str = "SANITY_USE_CDN";
pub const ENV_TIMEOUT_SECS: &str = "SANITY_TIMEOUT_SECS";
pub const ENV_SITE_URL: &str = "SITE_URL";
pub const ENV_ENVIRONMENT: &str = "FOLIO_ENV";

pub const DEFAULT_API_VERSION: &str = "v2024-01-01";
pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Deployment flavour. Drives the revalidation window of cached queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    /// How long a cached query result may be served before it is re-fetched.
    ///
    /// Near-immediate while editing content locally, an hour otherwise.
    pub fn revalidate(self) -> Duration {
        match self {
            Environment::Development => Duration::from_secs(30),
            Environment::Production => Duration::from_secs(3600),
        }
    }

    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Environment::Development),
            "production" | "prod" | "preview" => Ok(Environment::Production),
            other => Err(ConfigError::Validation(format!(
                "{ENV_ENVIRONMENT} must be 'development' or 'production', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Environment::Development => "development",
            Environment::Production => "production",
        })
    }
}

/// Project id and dataset of a configured content store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Store<'a> {
    pub project_id: &'a str,
    pub dataset: &'a str,
}

/// Immutable content store settings, resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    project_id: Option<String>,
    dataset: Option<String>,
    api_token: Option<String>,
    api_version: String,
    use_cdn: bool,
    timeout: Duration,
    site_url: String,
    environment: Environment,
}

impl Default for Settings {
    fn default() -> Self {
        Self::unconfigured()
    }
}

impl Settings {
    /// Settings with no content store. Every fetch degrades to empty.
    pub fn unconfigured() -> Self {
        Self {
            project_id: None,
            dataset: None,
            api_token: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            use_cdn: true,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            site_url: DEFAULT_SITE_URL.to_string(),
            environment: Environment::default(),
        }
    }

    /// Settings pointing at a project and dataset, everything else default.
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: non_blank(Some(project_id.into())),
            dataset: non_blank(Some(dataset.into())),
            ..Self::unconfigured()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = non_blank(Some(token.into()));
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_site_url(mut self, site_url: impl Into<String>) -> Self {
        self.site_url = site_url.into();
        self
    }

    pub fn with_cdn(mut self, use_cdn: bool) -> Self {
        self.use_cdn = use_cdn;
        self
    }

    /// Resolve settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through an arbitrary lookup function.
    ///
    /// Blank values are treated as absent. The result is validated before it
    /// is returned.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_blank(lookup(key));

        let use_cdn = match get(ENV_USE_CDN) {
            Some(raw) => parse_bool(ENV_USE_CDN, &raw)?,
            None => true,
        };
        let timeout = match get(ENV_TIMEOUT_SECS) {
            Some(raw) => raw.parse::<u64>().map(Duration::from_secs).map_err(|_| {
                ConfigError::Validation(format!(
                    "{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{raw}'"
                ))
            })?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        let environment = match get(ENV_ENVIRONMENT) {
            Some(raw) => Environment::parse(&raw)?,
            None => Environment::default(),
        };

        let settings = Self {
            project_id: get(ENV_PROJECT_ID),
            dataset: get(ENV_DATASET),
            api_token: get(ENV_API_TOKEN),
            api_version: get(ENV_API_VERSION).unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            use_cdn,
            timeout,
            site_url: get(ENV_SITE_URL).unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),
            environment,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Validate values are well-formed. Absent identifiers are not an error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(id) = &self.project_id
            && !id
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ConfigError::Validation(format!(
                "{ENV_PROJECT_ID} may only contain a-z, 0-9 and dashes, got '{id}'"
            )));
        }
        if let Some(dataset) = &self.dataset {
            let valid_chars = dataset
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');
            let valid_start = dataset
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphanumeric());
            if !valid_chars || !valid_start || dataset.len() > 64 {
                return Err(ConfigError::Validation(format!(
                    "{ENV_DATASET} must be 1-64 chars of a-z, 0-9, '_' or '-', got '{dataset}'"
                )));
            }
        }
        if !is_valid_api_version(&self.api_version) {
            return Err(ConfigError::Validation(format!(
                "{ENV_API_VERSION} must look like 'v2024-01-01', 'v1' or 'vX', got '{}'",
                self.api_version
            )));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::Validation(format!(
                "{ENV_TIMEOUT_SECS} must be greater than zero"
            )));
        }
        if !(self.site_url.starts_with("http://") || self.site_url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "{ENV_SITE_URL} must be an absolute http(s) URL, got '{}'",
                self.site_url
            )));
        }
        Ok(())
    }

    /// Whether the content store can be queried at all.
    pub fn is_configured(&self) -> bool {
        self.store().is_some()
    }

    /// Project id and dataset, if both are present.
    pub fn store(&self) -> Option<Store<'_>> {
        match (&self.project_id, &self.dataset) {
            (Some(project_id), Some(dataset)) => Some(Store {
                project_id,
                dataset,
            }),
            _ => None,
        }
    }

    pub fn api_token(&self) -> Option<&str> {
        self.api_token.as_deref()
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// The API CDN only serves unauthenticated requests.
    pub fn use_cdn(&self) -> bool {
        self.use_cdn && self.api_token.is_none()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Public site origin without a trailing slash.
    pub fn site_url(&self) -> &str {
        self.site_url.trim_end_matches('/')
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Validation(format!(
            "{key} must be true or false, got '{raw}'"
        ))),
    }
}

fn is_valid_api_version(version: &str) -> bool {
    match version.strip_prefix('v') {
        Some("1") | Some("X") => true,
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok(),
        None => false,
    }
}

/// Returns a fully-commented `.env` template with every variable explained.
///
/// Used by the `gen-env` CLI command.
pub fn stock_env() -> &'static str {
    r#"# folio-content environment
# =========================
# Without SANITY_PROJECT_ID and SANITY_DATASET the site still builds,
# with empty blog and project sections.

# Content store project id (Sanity manage → Project ID)
SANITY_PROJECT_ID=

# Dataset to read from
SANITY_DATASET=production

# Read token. Leave empty for public datasets.
SANITY_API_TOKEN=

# Dated API version
SANITY_API_VERSION=v2024-01-01

# Serve queries from the API CDN (ignored when a token is set)
SANITY_USE_CDN=true

# Seconds before a content request is abandoned
SANITY_TIMEOUT_SECS=10

# Public origin used for sitemap and canonical URLs
SITE_URL=http://localhost:3000

# development: 30s revalidation window, production: 1h
FOLIO_ENV=production
"#
}
