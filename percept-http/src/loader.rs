use std::time::Duration;

use percept::{ImageLoadError, ImageLoader, LoadedImage};

use crate::{DEFAULT_TIMEOUT, Endpoint, HttpError};

/// Fetches survey images over HTTP.
///
/// A load succeeds only for a 2xx response whose body decodes as an image.
#[derive(Debug, Clone)]
pub struct HttpImageLoader {
    endpoint: Endpoint,
}

impl HttpImageLoader {
    /// Create a loader resolving image URLs against `base_url`.
    pub fn new(base_url: &str) -> Result<Self, HttpError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, HttpError> {
        Ok(Self {
            endpoint: Endpoint::new(base_url, timeout)?,
        })
    }
}

impl ImageLoader for HttpImageLoader {
    fn load(&self, url: &str) -> Result<LoadedImage, ImageLoadError> {
        let transport = |source: anyhow::Error| ImageLoadError::Transport {
            url: url.to_string(),
            source,
        };

        let target = self.endpoint.resolve(url).map_err(transport)?;
        let response = self
            .endpoint
            .client
            .get(target)
            .send()
            .map_err(|e| transport(e.into()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageLoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().map_err(|e| transport(e.into()))?.to_vec();
        let decoded = image::load_from_memory(&bytes).map_err(|e| ImageLoadError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        tracing::debug!(
            url,
            width = decoded.width(),
            height = decoded.height(),
            "image loaded"
        );

        Ok(LoadedImage {
            url: url.to_string(),
            width: decoded.width(),
            height: decoded.height(),
            bytes,
        })
    }
}
