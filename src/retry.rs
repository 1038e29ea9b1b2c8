use std::time::Duration;

use tokio::time::sleep;

use crate::{
    ensure_retry_state, HttpClient, RequestConfig, RequestError, Response, Result, RetryOptions,
    TransformRequest, Transport,
};

/// Attaches the retry layer to `client`.
///
/// Without `options` the layer retries up to 3 times with no delay. The
/// options are fixed here and shared by every request the client sends.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
///
/// use stretch_retry::{attach, delay, HttpClient, RetryOptions};
///
/// let client = attach(
///     HttpClient::new(),
///     Some(RetryOptions {
///         max_retries: 3,
///         retry_delay: delay::linear(Duration::from_secs(1)),
///     }),
/// );
/// ```
pub fn attach<T: Transport>(
    client: HttpClient<T>,
    options: Option<RetryOptions>,
) -> HttpClient<Retry<T>> {
    let options = options.unwrap_or_default();
    client.map_transport(|transport| Retry::new(transport, options))
}

/// Retry decorator around a [`Transport`].
///
/// Every failed attempt that still carries its configuration is replayed
/// after the configured delay, until `max_retries` retries have been spent.
/// Before each replay the attempt timeout (when one is set) is extended by
/// the delay, and the body transform pipeline is switched off because the
/// body was already transformed by the first attempt.
///
/// A caller sees a single outcome: the first success, or the failure that
/// ended the chain, unmodified.
#[derive(Clone, Debug)]
pub struct Retry<T> {
    inner: T,
    options: RetryOptions,
}

struct ScheduledRetry {
    config: RequestConfig,
    delay: Duration,
}

impl<T> Retry<T> {
    /// Wraps `inner` with the given retry options.
    pub fn new(inner: T, options: RetryOptions) -> Self {
        Self { inner, options }
    }

    /// Returns the wrapped transport.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Returns the options fixed at attachment.
    pub fn options(&self) -> &RetryOptions {
        &self.options
    }

    /// Decides what happens to a failed attempt: either a replay is
    /// scheduled, or the failure is handed back untouched.
    fn on_response_error(
        &self,
        mut err: RequestError,
    ) -> std::result::Result<ScheduledRetry, RequestError> {
        let attempt = {
            let Some(config) = err.config.as_deref_mut() else {
                return Err(err);
            };
            let state = ensure_retry_state(config);
            if state.retry_count >= self.options.max_retries {
                return Err(err);
            }
            state.retry_count += 1;
            state.retry_count
        };

        let delay = (self.options.retry_delay)(attempt, &err);

        let Some(config) = err.config.take() else {
            return Err(err);
        };
        let mut config = *config;

        if let Some(timeout) = config.timeout_budget() {
            config.timeout = Some(timeout.saturating_add(delay));
        }
        config.transform_request = TransformRequest::passthrough();

        Ok(ScheduledRetry { config, delay })
    }
}

impl<T: Transport> Transport for Retry<T> {
    async fn send(&self, mut config: RequestConfig) -> Result<Response> {
        loop {
            ensure_retry_state(&mut config);

            let err = match self.inner.send(config).await {
                Ok(response) => return Ok(response),
                Err(err) => err,
            };

            let scheduled = self.on_response_error(err)?;

            #[cfg(feature = "tracing")]
            tracing::debug!(
                url = %scheduled.config.url,
                retry_count = scheduled.config.retry_count(),
                "retrying request after {} ms",
                scheduled.delay.as_millis()
            );

            sleep(scheduled.delay).await;
            config = scheduled.config;
        }
    }
}
