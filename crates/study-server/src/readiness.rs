use std::time::{Duration, Instant};

use anyhow::bail;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Poll `url` until the server behind it answers with any HTTP response, or
/// `timeout` elapses. Returns the number of attempts it took.
///
/// Any status counts as ready: the goal is to know the server is accepting
/// and handling requests, not that a particular resource exists.
pub async fn wait_until_ready(url: &str, timeout: Duration, interval: Duration) -> anyhow::Result<u32> {
    let client = reqwest::Client::builder()
        .timeout(interval.max(Duration::from_millis(500)))
        .build()?;
    let deadline = Instant::now() + timeout;
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        match client.get(url).send().await {
            Ok(resp) => {
                tracing::debug!(url, attempts, status = %resp.status(), "server ready");
                return Ok(attempts);
            }
            Err(e) => {
                tracing::trace!(url, attempts, "not ready yet: {e}");
            }
        }
        if Instant::now() + interval > deadline {
            bail!(
                "{url} did not become ready within {}ms ({attempts} attempts)",
                timeout.as_millis()
            );
        }
        tokio::time::sleep(interval).await;
    }
}
