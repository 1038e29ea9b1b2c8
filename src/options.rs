use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::HeaderMap;

use crate::{
    delay::{self, RetryDelay},
    RequestError,
};

/// Defaults applied to every request built by [`HttpClient`](crate::HttpClient).
#[derive(Clone, Debug, Default)]
pub struct ClientOptions {
    /// Prefix for relative request URLs.
    pub base_url: Option<String>,
    /// Per-attempt timeout in milliseconds, used when a request sets none.
    pub timeout_ms: Option<u64>,
    /// Headers added to each request unless the request sets them itself.
    pub headers: HeaderMap,
}

/// Configures the retry layer. Fixed when the layer is attached.
#[derive(Clone)]
pub struct RetryOptions {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,
    /// Wait before each retry.
    pub retry_delay: RetryDelay,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: delay::no_delay(),
        }
    }
}

impl fmt::Debug for RetryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryOptions")
            .field("max_retries", &self.max_retries)
            .field("retry_delay", &"<fn>")
            .finish()
    }
}

impl RetryOptions {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the delay function, called with the 1-based retry number and the
    /// failure being retried.
    pub fn with_retry_delay<F>(mut self, retry_delay: F) -> Self
    where
        F: Fn(u32, &RequestError) -> Duration + Send + Sync + 'static,
    {
        self.retry_delay = Arc::new(retry_delay);
        self
    }

    /// Reads retry options from environment variables.
    ///
    /// Reads:
    /// - `HTTP_RETRY_MAX_RETRIES` — maximum retries (default 3)
    /// - `HTTP_RETRY_DELAY_MS` — constant delay in milliseconds (default 0)
    ///
    /// Unset variables keep their defaults; unparsable values are an error.
    pub fn from_env() -> std::result::Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> std::result::Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();

        if let Some(raw) = lookup("HTTP_RETRY_MAX_RETRIES") {
            options.max_retries = raw
                .trim()
                .parse()
                .map_err(|_| format!("invalid HTTP_RETRY_MAX_RETRIES value '{raw}'"))?;
        }
        if let Some(raw) = lookup("HTTP_RETRY_DELAY_MS") {
            let millis: u64 = raw
                .trim()
                .parse()
                .map_err(|_| format!("invalid HTTP_RETRY_DELAY_MS value '{raw}'"))?;
            options.retry_delay = delay::constant(Duration::from_millis(millis));
        }

        Ok(options)
    }
}
