use crate::RequestConfig;

/// What went wrong during a single attempt.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Non-success HTTP status code with raw response body.
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
    /// The request body could not be transformed into wire bytes.
    #[error("encode error: {0}")]
    Encode(String),
}

/// Error type returned by this crate.
///
/// A failure carries the configuration of the attempt that produced it, when
/// one is known. The retry layer replays that configuration; a failure
/// without one is never retried.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct RequestError {
    #[source]
    pub(crate) kind: ErrorKind,
    pub(crate) config: Option<Box<RequestConfig>>,
}

impl RequestError {
    /// Creates a failure for the given attempt configuration.
    pub fn new(kind: ErrorKind, config: Option<RequestConfig>) -> Self {
        Self {
            kind,
            config: config.map(Box::new),
        }
    }

    /// Creates a failure that could not be associated with a request,
    /// e.g. one raised before dispatch.
    pub fn without_config(kind: ErrorKind) -> Self {
        Self { kind, config: None }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }

    /// Configuration of the attempt that failed, including its retry state
    /// and (possibly extended) timeout.
    pub fn config(&self) -> Option<&RequestConfig> {
        self.config.as_deref()
    }

    /// HTTP status of the failed response, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Http { status, .. } => Some(*status),
            ErrorKind::Transport(err) => err.status().map(|status| status.as_u16()),
            ErrorKind::Encode(_) => None,
        }
    }

    /// Whether the attempt was aborted by its timeout budget.
    pub fn is_timeout(&self) -> bool {
        matches!(&self.kind, ErrorKind::Transport(err) if err.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, RequestError};
    use crate::RequestConfig;

    #[test]
    fn display_delegates_to_kind() {
        let err = RequestError::without_config(ErrorKind::Http {
            status: 503,
            body: "busy".to_owned(),
        });
        assert_eq!(err.to_string(), "http error 503: busy");
        assert_eq!(err.status(), Some(503));
        assert!(!err.is_timeout());
        assert!(err.config().is_none());
    }

    #[test]
    fn keeps_attempt_config() {
        let err = RequestError::new(
            ErrorKind::Encode("bad body".to_owned()),
            Some(RequestConfig::get("http://example.com/test")),
        );
        let config = err.config().expect("config must be attached");
        assert_eq!(config.url, "http://example.com/test");
        assert_eq!(err.status(), None);
    }
}
