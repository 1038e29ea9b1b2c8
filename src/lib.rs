//! `stretch-retry` adds transparent retries to an async HTTP client.
//!
//! Failed attempts are replayed after a configurable delay, and the attempt
//! timeout is extended by that delay so a replay is not cut short by a budget
//! sized for the first attempt:
//! - [`attach`] / [`HttpClient::with_retry`] install the retry layer
//! - [`RetryOptions`] sets the retry limit and the [`delay`] function
//! - [`RetryState`] on each [`RequestConfig`] counts the retries of one request

mod client;
pub mod delay;
mod error;
mod options;
mod request;
mod response;
mod retry;
mod state;
mod transport;

pub use client::HttpClient;
pub use error::{ErrorKind, RequestError};
pub use options::{ClientOptions, RetryOptions};
pub use request::{Body, RequestConfig, TransformFn, TransformRequest};
pub use response::Response;
pub use retry::{attach, Retry};
pub use state::{ensure_retry_state, RetryState};
pub use transport::{ReqwestTransport, Transport};

pub type Result<T> = std::result::Result<T, RequestError>;
