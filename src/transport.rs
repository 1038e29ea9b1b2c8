use std::future::Future;

use crate::{error::ErrorKind, RequestConfig, RequestError, Response, Result};

/// Performs one attempt of a request.
///
/// Implementations hand the (possibly mutated) configuration back on both
/// success and failure, so a failed attempt can be replayed. A failure raised
/// before anything was dispatched carries no configuration.
pub trait Transport: Send + Sync {
    fn send(&self, config: RequestConfig) -> impl Future<Output = Result<Response>> + Send;
}

/// [`Transport`] backed by `reqwest`.
///
/// Non-2xx responses are reported as [`ErrorKind::Http`] failures.
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport over a default `reqwest::Client`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a preconfigured `reqwest` client (proxies, TLS, pooling).
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, mut config: RequestConfig) -> Result<Response> {
        // Nothing was dispatched, so there is no attempt to replay.
        if let Err(kind) = config.transform_body() {
            return Err(RequestError::without_config(kind));
        }

        let mut request = self
            .http
            .request(config.method.clone(), &config.url)
            .headers(config.headers.clone());

        if let Some(timeout) = config.timeout_budget() {
            request = request.timeout(timeout);
        }

        if let Some(body) = config.body.clone() {
            match body.into_wire() {
                Ok(bytes) => request = request.body(bytes),
                Err(kind) => return Err(RequestError::without_config(kind)),
            }
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => return Err(RequestError::new(ErrorKind::Transport(err), Some(config))),
        };

        let status = response.status();
        let headers = response.headers().clone();
        let body = match response.bytes().await {
            Ok(body) => body.to_vec(),
            Err(err) => return Err(RequestError::new(ErrorKind::Transport(err), Some(config))),
        };

        if !status.is_success() {
            let body = String::from_utf8_lossy(&body).into_owned();
            return Err(RequestError::new(
                ErrorKind::Http {
                    status: status.as_u16(),
                    body,
                },
                Some(config),
            ));
        }

        Ok(Response::new(status, headers, body, config))
    }
}
