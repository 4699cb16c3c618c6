use super::repository::JobStore;
use super::validator::{
    IntakeNamespace, dest_path, extension, intake_namespace, parse_job_id, validate,
};
use crate::common::error::PipelineError;
use crate::common::retry::with_backoff;
use crate::modules::pipeline::model::{JobState, VideoJob};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use utoipa::ToSchema;

/// Seam to the transcode worker. The production implementation posts to the
/// worker's HTTP surface with a bounded timeout.
#[async_trait]
pub trait TranscodeDispatcher: Send + Sync {
    async fn dispatch(&self, bucket: &str, src: &str, dest: &str) -> Result<(), PipelineError>;
}

/// One extra attempt is safe: dest_path is deterministic, so a duplicate
/// dispatch overwrites the destination with identical content.
const DISPATCH_ATTEMPTS: u32 = 2;

const STORE_WRITE_ATTEMPTS: u32 = 3;
const STORE_WRITE_BACKOFF: Duration = Duration::from_millis(50);

/// How a finalize event was resolved. Failures still return 200 to the event
/// source (the job record carries the cause); only store outages bubble up as
/// errors so the platform redelivers.
#[derive(Debug, Serialize, PartialEq, ToSchema)]
#[serde(tag = "outcome", content = "detail", rename_all = "camelCase")]
pub enum FinalizeOutcome {
    /// Object outside the intake namespaces, or no parsable job id.
    Ignored,
    Blocked,
    WarningRecorded,
    /// A previous delivery already moved the job past this transition.
    AlreadyHandled,
    Published { url: String },
    Failed { cause: String },
}

#[derive(Clone)]
pub struct PipelineService {
    store: Arc<dyn JobStore>,
    dispatcher: Arc<dyn TranscodeDispatcher>,
}

/// Public playback URL for a published object. Formatting contract only; the
/// store itself defines what the URL serves.
pub fn public_url(bucket: &str, dest: &str) -> String {
    format!("https://storage.googleapis.com/{}/{}", bucket, dest)
}

impl PipelineService {
    pub fn new(store: Arc<dyn JobStore>, dispatcher: Arc<dyn TranscodeDispatcher>) -> Self {
        Self { store, dispatcher }
    }

    pub async fn job(&self, id: &str) -> Result<VideoJob, PipelineError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| PipelineError::NotFound(format!("job {}", id)))
    }

    /// Drives one object-finalize event through the state machine:
    /// Validating -> Blocked, or Validating -> Processing -> Published/Failed.
    pub async fn handle_finalize(
        &self,
        bucket: &str,
        name: &str,
        duration_sec: Option<f64>,
        height_px: Option<i32>,
    ) -> Result<FinalizeOutcome, PipelineError> {
        let Some(namespace) = intake_namespace(name) else {
            return Ok(FinalizeOutcome::Ignored);
        };
        let Some(id) = parse_job_id(name) else {
            return Ok(FinalizeOutcome::Ignored);
        };

        let violations = validate(duration_sec, height_px, extension(name));

        if namespace == IntakeNamespace::Published {
            // Published objects never re-enter transcoding; a lone format
            // warning is still worth recording.
            if violations.mov_format && !violations.blocked() {
                self.store.record_warning(&id, name).await?;
                return Ok(FinalizeOutcome::WarningRecorded);
            }
            return Ok(FinalizeOutcome::Ignored);
        }

        // Terminal states never re-enter the machine, and their recorded
        // violations are left untouched by redeliveries.
        if let Some(existing) = self.store.get(&id).await? {
            let state = existing.job_state();
            if state.is_terminal() {
                return Ok(FinalizeOutcome::AlreadyHandled);
            }
            // A crash between claiming the job and hearing back from the
            // worker strands it in Processing. dest_path is deterministic,
            // so a redelivery can re-dispatch and finish the job.
            if state == JobState::Processing {
                let dest = existing.dest_path.unwrap_or_else(|| dest_path(name));
                return self.finish_dispatch(bucket, name, &id, &dest).await;
            }
        }

        with_backoff(STORE_WRITE_ATTEMPTS, STORE_WRITE_BACKOFF, || {
            self.store
                .upsert_validating(&id, name, duration_sec, height_px, violations)
        })
        .await?;

        if violations.blocked() {
            let applied = with_backoff(STORE_WRITE_ATTEMPTS, STORE_WRITE_BACKOFF, || {
                self.store.mark_blocked(&id)
            })
            .await?;

            info!("Job {} blocked by policy: {:?}", id, violations);
            return Ok(if applied {
                FinalizeOutcome::Blocked
            } else {
                FinalizeOutcome::AlreadyHandled
            });
        }

        let dest = dest_path(name);
        let applied = with_backoff(STORE_WRITE_ATTEMPTS, STORE_WRITE_BACKOFF, || {
            self.store.mark_processing(&id, &dest)
        })
        .await?;
        if !applied {
            // Another delivery won the Validating -> Processing race.
            return Ok(FinalizeOutcome::AlreadyHandled);
        }

        self.finish_dispatch(bucket, name, &id, &dest).await
    }

    /// Dispatches to the worker and records the terminal state. Also the
    /// recovery path for jobs found already claimed as Processing: dispatch
    /// is idempotent and the conditional writes only fire from Processing.
    async fn finish_dispatch(
        &self,
        bucket: &str,
        src: &str,
        id: &str,
        dest: &str,
    ) -> Result<FinalizeOutcome, PipelineError> {
        match self.dispatch_with_retry(bucket, src, dest).await {
            Ok(()) => {
                let url = public_url(bucket, dest);
                with_backoff(STORE_WRITE_ATTEMPTS, STORE_WRITE_BACKOFF, || {
                    self.store.mark_published(id, &url)
                })
                .await?;
                info!("Job {} published at {}", id, url);
                Ok(FinalizeOutcome::Published { url })
            }
            Err(e) => {
                // Never leave a job parked in Processing without a cause.
                let cause = e.to_string();
                with_backoff(STORE_WRITE_ATTEMPTS, STORE_WRITE_BACKOFF, || {
                    self.store.mark_failed(id, &cause)
                })
                .await?;
                warn!("Job {} failed: {}", id, cause);
                Ok(FinalizeOutcome::Failed { cause })
            }
        }
    }

    async fn dispatch_with_retry(
        &self,
        bucket: &str,
        src: &str,
        dest: &str,
    ) -> Result<(), PipelineError> {
        let mut last = None;
        for attempt in 1..=DISPATCH_ATTEMPTS {
            match self.dispatcher.dispatch(bucket, src, dest).await {
                Ok(()) => return Ok(()),
                // A timed-out encode may still be running; retrying on top of
                // it buys nothing.
                Err(PipelineError::Timeout) => return Err(PipelineError::Timeout),
                Err(e) => {
                    warn!("Transcode dispatch attempt {} failed: {}", attempt, e);
                    last = Some(e);
                }
            }
        }
        Err(last.unwrap_or_else(|| PipelineError::TranscodeFailure("dispatch failed".to_string())))
    }
}
