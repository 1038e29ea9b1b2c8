use reqwest::{header::HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

use crate::RequestConfig;

/// Successful response together with the configuration that produced it.
#[derive(Debug)]
pub struct Response {
    pub(crate) status: StatusCode,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Vec<u8>,
    pub(crate) config: RequestConfig,
}

impl Response {
    pub fn new(
        status: StatusCode,
        headers: HeaderMap,
        body: Vec<u8>,
        config: RequestConfig,
    ) -> Self {
        Self {
            status,
            headers,
            body,
            config,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }

    /// Settled configuration: final retry count and accumulated timeout.
    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    pub fn into_config(self) -> RequestConfig {
        self.config
    }
}
