/// Error type for invalid survey and form configurations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration is not valid JSON or has the wrong shape.
    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The question source does not contain a single complete pair.
    #[error("The survey needs at least one complete image pair")]
    NoPairs,

    #[error("The time bar duration must be positive")]
    ZeroTimeBar,

    #[error("No submission URL configured")]
    MissingPostUrl,

    #[error("No survey identifier configured")]
    MissingSurveyId,

    #[error("The form has no questions")]
    NoQuestions,
}

/// Error type for image fetches.
#[derive(Debug, thiserror::Error)]
pub enum ImageLoadError {
    /// The server answered with a non-success status.
    #[error("Image {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// The bytes could not be decoded as an image.
    #[error("Image {url} could not be decoded: {reason}")]
    Decode { url: String, reason: String },

    /// The request never completed.
    #[error("Image {url} could not be fetched: {source}")]
    Transport {
        url: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ImageLoadError {
    /// A failure to produce the image at all, from any error type.
    pub fn transport(url: impl Into<String>, err: impl Into<anyhow::Error>) -> Self {
        Self::Transport {
            url: url.into(),
            source: err.into(),
        }
    }

    /// The URL of the image that failed.
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. } | Self::Decode { url, .. } | Self::Transport { url, .. } => {
                url
            }
        }
    }
}

/// Error type for submissions that did not produce any HTTP response.
///
/// Non-success statuses are not errors at this level; they come back as a
/// [`SubmitResponse`](crate::SubmitResponse) so the caller can read the body.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The request could not be sent or the response not read.
    #[error("{0}")]
    Transport(#[from] anyhow::Error),
}

impl SubmitError {
    /// Create a transport error from any error type.
    pub fn transport(err: impl Into<anyhow::Error>) -> Self {
        Self::Transport(err.into())
    }
}

/// Error type for survey flow operations.
#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    /// An input arrived while the survey was not waiting for one.
    #[error("The survey is not presenting a question")]
    NotPresenting,

    /// The cursor ran past the question source.
    #[error("No complete image pair at position {cursor}")]
    MissingPair { cursor: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Answers could not be serialized for submission.
    #[error("Could not serialize answers: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Backend-specific failure (I/O, UI framework crash, etc.)
    #[error("Backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl SurveyError {
    /// Create a backend error from any error type.
    pub fn backend(err: impl Into<anyhow::Error>) -> Self {
        Self::Backend(err.into())
    }

    /// Check if this error is a rejected out-of-phase input.
    pub fn is_not_presenting(&self) -> bool {
        matches!(self, Self::NotPresenting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_error_reports_url() {
        let err = ImageLoadError::Status {
            url: "/img/0/l".into(),
            status: 404,
        };
        assert_eq!(err.url(), "/img/0/l");
        assert_eq!(err.to_string(), "Image /img/0/l returned status 404");
    }

    #[test]
    fn image_transport_wraps_any_error() {
        let io = std::io::Error::other("encoder gave up");
        let err = ImageLoadError::transport("/img/1/r", io);
        assert!(matches!(err, ImageLoadError::Transport { .. }));
        assert_eq!(err.url(), "/img/1/r");
        assert_eq!(
            err.to_string(),
            "Image /img/1/r could not be fetched: encoder gave up"
        );
    }

    #[test]
    fn submit_transport_message_is_inner_message() {
        let err = SubmitError::transport(anyhow::anyhow!("connection refused"));
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn survey_error_from_config() {
        let err: SurveyError = ConfigError::NoPairs.into();
        assert_eq!(
            err.to_string(),
            "The survey needs at least one complete image pair"
        );
        assert!(SurveyError::NotPresenting.is_not_presenting());
    }
}
