use std::time::Duration;

use percept::{SubmitError, SubmitResponse, Submitter};
use reqwest::header::CONTENT_TYPE;

use crate::{DEFAULT_TIMEOUT, Endpoint, HttpError};

/// Header carrying the page's same-origin protection token.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Posts JSON documents over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSubmitter {
    endpoint: Endpoint,
    csrf_token: Option<String>,
}

impl HttpSubmitter {
    /// Create a submitter resolving endpoints against `base_url`.
    pub fn new(base_url: &str) -> Result<Self, HttpError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, HttpError> {
        Ok(Self {
            endpoint: Endpoint::new(base_url, timeout)?,
            csrf_token: None,
        })
    }

    /// Send `token` in the `X-CSRFToken` header of every submission.
    pub fn with_csrf_token(mut self, token: Option<String>) -> Self {
        self.csrf_token = token;
        self
    }
}

impl Submitter for HttpSubmitter {
    fn submit(&self, url: &str, body: &str) -> Result<SubmitResponse, SubmitError> {
        let target = self.endpoint.resolve(url)?;
        let mut request = self
            .endpoint
            .client
            .post(target)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string());
        if let Some(token) = &self.csrf_token {
            request = request.header(CSRF_HEADER, token);
        }

        let response = request.send().map_err(SubmitError::transport)?;
        let status = response.status().as_u16();
        let text = response.text().map_err(SubmitError::transport)?;
        tracing::debug!(url, status, "submission answered");
        Ok(SubmitResponse::new(status, text))
    }
}
