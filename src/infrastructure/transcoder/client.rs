use crate::common::error::PipelineError;
use crate::modules::pipeline::service::TranscodeDispatcher;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::info;

/// HTTP client for the transcode worker. The call is synchronous and
/// timeout-bounded: the orchestrator must know the terminal outcome before it
/// records the job's final state.
#[derive(Clone)]
pub struct TranscoderClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Deserialize)]
struct WorkerError {
    error: String,
}

impl TranscoderClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl TranscodeDispatcher for TranscoderClient {
    async fn dispatch(&self, bucket: &str, src: &str, dest: &str) -> Result<(), PipelineError> {
        let url = format!("{}/transcode", self.base_url);
        info!("Dispatching transcode {} -> {}", src, dest);

        let response = self
            .http
            .post(&url)
            .timeout(self.timeout)
            .json(&json!({ "bucket": bucket, "src": src, "dest": dest }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PipelineError::Timeout
                } else {
                    PipelineError::TranscodeFailure(e.to_string())
                }
            })?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let cause = match response.json::<WorkerError>().await {
            Ok(body) => body.error,
            Err(_) => format!("worker returned {}", status),
        };

        Err(PipelineError::TranscodeFailure(cause))
    }
}
