//! HTTP backends for percept.
//!
//! [`HttpImageLoader`] fetches survey images and checks that they decode;
//! [`HttpSubmitter`] posts answers as JSON. Both resolve the site-relative
//! URLs of a survey configuration against a base URL.
//!
//! ```rust,ignore
//! let loader = HttpImageLoader::new("http://localhost:5000")?;
//! let submitter = HttpSubmitter::new("http://localhost:5000")?
//!     .with_csrf_token(config.csrf_token.clone());
//! ```

use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;

mod loader;
pub use loader::HttpImageLoader;

mod submitter;
pub use submitter::HttpSubmitter;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Error type for building HTTP backends.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The base URL is not an absolute http(s) URL.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// A blocking client bound to a base URL.
#[derive(Debug, Clone)]
struct Endpoint {
    client: Client,
    base: Url,
}

impl Endpoint {
    fn new(base_url: &str, timeout: Duration) -> Result<Self, HttpError> {
        let base = Url::parse(base_url).map_err(|e| HttpError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(HttpError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme '{}'", base.scheme()),
            });
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    /// Resolve a site-relative or absolute URL.
    fn resolve(&self, url: &str) -> Result<Url, anyhow::Error> {
        Ok(self.base.join(url)?)
    }
}
