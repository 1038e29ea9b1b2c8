use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;

use crate::{error::ErrorKind, RetryState};

/// Request payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    /// Raw bytes sent as-is.
    Bytes(Vec<u8>),
    /// UTF-8 text.
    Text(String),
    /// JSON document, serialized by the default transform.
    Json(serde_json::Value),
}

impl Body {
    pub(crate) fn into_wire(self) -> Result<Vec<u8>, ErrorKind> {
        match self {
            Self::Bytes(bytes) => Ok(bytes),
            Self::Text(text) => Ok(text.into_bytes()),
            Self::Json(value) => {
                serde_json::to_vec(&value).map_err(|err| ErrorKind::Encode(err.to_string()))
            }
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for Body {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<serde_json::Value> for Body {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

/// A single body transform step. May adjust headers alongside the body.
pub type TransformFn = Arc<dyn Fn(&Body, &mut HeaderMap) -> Result<Body, String> + Send + Sync>;

/// Ordered pipeline of body transforms applied before an attempt is sent.
#[derive(Clone)]
pub struct TransformRequest {
    steps: Vec<TransformFn>,
}

impl TransformRequest {
    /// Pipeline that leaves the body untouched.
    pub fn passthrough() -> Self {
        Self { steps: Vec::new() }
    }

    /// Appends a step to the pipeline.
    pub fn then<F>(mut self, step: F) -> Self
    where
        F: Fn(&Body, &mut HeaderMap) -> Result<Body, String> + Send + Sync + 'static,
    {
        self.steps.push(Arc::new(step));
        self
    }

    pub fn is_passthrough(&self) -> bool {
        self.steps.is_empty()
    }

    fn apply(&self, body: &Body, headers: &mut HeaderMap) -> Result<Body, String> {
        let mut current = body.clone();
        for step in &self.steps {
            current = step(&current, headers)?;
        }
        Ok(current)
    }
}

/// Serializes text and JSON bodies and sets a content type when none is set.
impl Default for TransformRequest {
    fn default() -> Self {
        Self::passthrough().then(encode_body)
    }
}

impl fmt::Debug for TransformRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformRequest")
            .field("steps", &self.steps.len())
            .finish()
    }
}

fn encode_body(body: &Body, headers: &mut HeaderMap) -> Result<Body, String> {
    match body {
        Body::Bytes(_) => Ok(body.clone()),
        Body::Text(text) => {
            headers
                .entry(header::CONTENT_TYPE)
                .or_insert(HeaderValue::from_static("text/plain;charset=utf-8"));
            Ok(Body::Bytes(text.clone().into_bytes()))
        }
        Body::Json(value) => {
            headers
                .entry(header::CONTENT_TYPE)
                .or_insert(HeaderValue::from_static("application/json"));
            serde_json::to_vec(value)
                .map(Body::Bytes)
                .map_err(|err| err.to_string())
        }
    }
}

/// Everything needed to dispatch (and replay) one request.
#[derive(Clone, Debug)]
pub struct RequestConfig {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Body>,
    /// Time budget for one attempt. `None` and zero both mean unlimited.
    pub timeout: Option<Duration>,
    pub transform_request: TransformRequest,
    /// Retry bookkeeping, attached by the retry layer.
    pub retry_state: Option<RetryState>,
}

impl RequestConfig {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
            transform_request: TransformRequest::default(),
            retry_state: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_transform_request(mut self, transform: TransformRequest) -> Self {
        self.transform_request = transform;
        self
    }

    /// Timeout actually enforced for the next attempt, if any.
    pub fn timeout_budget(&self) -> Option<Duration> {
        self.timeout.filter(|timeout| !timeout.is_zero())
    }

    /// Number of retries scheduled for this request so far.
    pub fn retry_count(&self) -> u32 {
        self.retry_state.map_or(0, |state| state.retry_count)
    }

    /// Runs the transform pipeline and stores the result as the new body.
    ///
    /// The body is left as it was when a step fails.
    pub fn transform_body(&mut self) -> Result<(), ErrorKind> {
        let Some(body) = self.body.as_ref() else {
            return Ok(());
        };
        let transformed = self
            .transform_request
            .apply(body, &mut self.headers)
            .map_err(ErrorKind::Encode)?;
        self.body = Some(transformed);
        Ok(())
    }
}
