use crate::common::error::PipelineError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Retries `op` up to `attempts` times with a doubling delay, but only while
/// the failure is transient. Non-transient errors surface immediately.
pub async fn with_backoff<T, F, Fut>(
    attempts: u32,
    base_delay: Duration,
    mut op: F,
) -> Result<T, PipelineError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PipelineError>>,
{
    let mut delay = base_delay;
    let mut last_attempt = 1;

    loop {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) if e.is_transient() && last_attempt < attempts => {
                warn!("transient failure (attempt {}/{}): {}", last_attempt, attempts, e);
                tokio::time::sleep(delay).await;
                delay *= 2;
                last_attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
