use std::time::Duration;

use stretch_retry::{attach, delay, ClientOptions, HttpClient, RetryOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let base_url =
        std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3333".to_owned());

    let client = HttpClient::new().with_options(ClientOptions {
        base_url: Some(base_url),
        timeout_ms: Some(2_000),
        ..ClientOptions::default()
    });

    // 1s, 2s, 3s between attempts; each retry gets that much more timeout.
    let client = attach(
        client,
        Some(RetryOptions {
            max_retries: 3,
            retry_delay: delay::linear(Duration::from_secs(1)),
        }),
    );

    let response = client.get("/test").await?;
    println!(
        "{} after {} retries (timeout {:?})",
        response.status(),
        response.config().retry_count(),
        response.config().timeout
    );

    Ok(())
}
