use std::time::Duration;

use serde::Serialize;

use crate::{
    attach, error::ErrorKind, Body, ClientOptions, ReqwestTransport, RequestConfig, RequestError,
    Response, Result, Retry, RetryOptions, Transport,
};

/// Async HTTP client over a pluggable [`Transport`].
///
/// Attach retries with [`HttpClient::with_retry`] or [`attach`]:
///
/// ```no_run
/// use stretch_retry::{HttpClient, RetryOptions};
///
/// # async fn run() -> stretch_retry::Result<()> {
/// let client = HttpClient::new().with_retry(RetryOptions::default());
/// let response = client.get("http://localhost:3333/health").await?;
/// println!("{}", response.status());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct HttpClient<T = ReqwestTransport> {
    transport: T,
    options: ClientOptions,
}

impl HttpClient {
    /// Creates a client backed by a default `reqwest::Client`.
    pub fn new() -> Self {
        Self::with_transport(ReqwestTransport::new())
    }

    /// Creates a client backed by a preconfigured `reqwest::Client`.
    pub fn from_reqwest(http: reqwest::Client) -> Self {
        Self::with_transport(ReqwestTransport::from_client(http))
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HttpClient<T> {
    /// Creates a client over a custom transport with default options.
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            options: ClientOptions::default(),
        }
    }

    /// Applies client options such as base URL and default timeout.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    /// Returns the request defaults.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub(crate) fn map_transport<U>(self, wrap: impl FnOnce(T) -> U) -> HttpClient<U> {
        HttpClient {
            transport: wrap(self.transport),
            options: self.options,
        }
    }

    fn apply_defaults(&self, mut config: RequestConfig) -> RequestConfig {
        config.url = resolve_url(self.options.base_url.as_deref(), &config.url);

        if config.timeout.is_none() {
            config.timeout = self.options.timeout_ms.map(Duration::from_millis);
        }

        for (name, value) in &self.options.headers {
            config
                .headers
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }

        config
    }
}

impl<T: Transport> HttpClient<T> {
    /// Wraps the transport in a retry layer configured by `options`.
    pub fn with_retry(self, options: RetryOptions) -> HttpClient<Retry<T>> {
        attach(self, Some(options))
    }

    /// Sends a request after applying the client defaults.
    pub async fn request(&self, config: RequestConfig) -> Result<Response> {
        let config = self.apply_defaults(config);
        self.transport.send(config).await
    }

    /// Sends a `GET` request.
    pub async fn get(&self, url: &str) -> Result<Response> {
        self.request(RequestConfig::get(url)).await
    }

    /// Sends a `DELETE` request.
    pub async fn delete(&self, url: &str) -> Result<Response> {
        self.request(RequestConfig::new(reqwest::Method::DELETE, url))
            .await
    }

    /// Sends a `POST` request with `body`.
    pub async fn post(&self, url: &str, body: impl Into<Body>) -> Result<Response> {
        let config = RequestConfig::new(reqwest::Method::POST, url).with_body(body);
        self.request(config).await
    }

    /// Sends a `PUT` request with `body`.
    pub async fn put(&self, url: &str, body: impl Into<Body>) -> Result<Response> {
        let config = RequestConfig::new(reqwest::Method::PUT, url).with_body(body);
        self.request(config).await
    }

    /// Serializes `body` to JSON and posts it.
    ///
    /// A value that cannot be represented as JSON fails before dispatch, so
    /// the failure carries no configuration and is never retried.
    pub async fn post_json<B>(&self, url: &str, body: &B) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let value = serde_json::to_value(body).map_err(|err| {
            RequestError::without_config(ErrorKind::Encode(err.to_string()))
        })?;
        self.post(url, value).await
    }
}

/// Joins a relative `url` onto `base`. Absolute URLs are returned unchanged.
fn resolve_url(base: Option<&str>, url: &str) -> String {
    match base {
        Some(base) if !is_absolute_url(url) => {
            if url.is_empty() {
                return base.to_owned();
            }
            format!(
                "{}/{}",
                base.trim_end_matches('/'),
                url.trim_start_matches('/')
            )
        }
        _ => url.to_owned(),
    }
}

fn is_absolute_url(url: &str) -> bool {
    if url.starts_with("//") {
        return true;
    }
    let Some((scheme, _)) = url.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|first| first.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::header::{self, HeaderMap, HeaderValue};

    use super::{resolve_url, HttpClient};
    use crate::{ClientOptions, RequestConfig};

    #[test]
    fn resolve_url_joins_relative_paths() {
        assert_eq!(
            resolve_url(Some("http://localhost:3333/"), "/users"),
            "http://localhost:3333/users"
        );
        assert_eq!(
            resolve_url(Some("http://localhost:3333/api"), "users"),
            "http://localhost:3333/api/users"
        );
        assert_eq!(
            resolve_url(Some("http://localhost:3333"), ""),
            "http://localhost:3333"
        );
    }

    #[test]
    fn resolve_url_keeps_absolute_urls() {
        assert_eq!(
            resolve_url(Some("http://localhost:3333"), "https://example.com/test"),
            "https://example.com/test"
        );
        assert_eq!(
            resolve_url(Some("http://localhost:3333"), "//cdn.example.com/a"),
            "//cdn.example.com/a"
        );
        assert_eq!(resolve_url(None, "/relative"), "/relative");
    }

    #[test]
    fn defaults_fill_only_missing_values() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(header::USER_AGENT, HeaderValue::from_static("stretch-retry"));
        let client = HttpClient::new().with_options(ClientOptions {
            base_url: Some("http://localhost:3333".to_owned()),
            timeout_ms: Some(1_000),
            headers,
        });

        let config = client.apply_defaults(
            RequestConfig::get("/test")
                .with_header(header::ACCEPT, HeaderValue::from_static("text/plain"))
                .with_timeout(Duration::from_millis(250)),
        );

        assert_eq!(config.url, "http://localhost:3333/test");
        assert_eq!(config.timeout, Some(Duration::from_millis(250)));
        assert_eq!(
            config.headers.get(header::ACCEPT),
            Some(&HeaderValue::from_static("text/plain"))
        );
        assert_eq!(
            config.headers.get(header::USER_AGENT),
            Some(&HeaderValue::from_static("stretch-retry"))
        );

        let config = client.apply_defaults(RequestConfig::get("/other"));
        assert_eq!(config.timeout, Some(Duration::from_millis(1_000)));
    }
}
