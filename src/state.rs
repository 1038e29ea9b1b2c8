use crate::RequestConfig;

/// Retry bookkeeping for one logical request.
///
/// The state lives on the [`RequestConfig`] and moves with it through every
/// replay, so the count accumulates across the whole chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RetryState {
    /// Number of retries scheduled so far.
    pub retry_count: u32,
}

/// Attaches a fresh state to `config` unless one is already present.
///
/// Runs before every attempt. An existing state is left untouched.
pub fn ensure_retry_state(config: &mut RequestConfig) -> &mut RetryState {
    config.retry_state.get_or_insert_with(RetryState::default)
}
