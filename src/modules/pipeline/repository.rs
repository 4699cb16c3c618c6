use super::model::{VideoJob, ViolationSet};
use crate::common::error::PipelineError;
use crate::infrastructure::db::pool::DbPool;
use async_trait::async_trait;

/// Job Record Store seam. Every transition is conditional on the expected
/// prior state so concurrent deliveries for the same job serialize without a
/// global lock: the losing writer simply affects zero rows.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<VideoJob>, PipelineError>;

    /// First observation of a raw object: creates the record at `Validating`
    /// and merges the latest metadata observations. Never regresses state on
    /// redelivery.
    async fn upsert_validating(
        &self,
        id: &str,
        source_path: &str,
        duration_sec: Option<f64>,
        height_px: Option<i32>,
        violations: ViolationSet,
    ) -> Result<VideoJob, PipelineError>;

    /// Merge-writes a format warning for an already-published object.
    async fn record_warning(&self, id: &str, source_path: &str) -> Result<(), PipelineError>;

    async fn mark_blocked(&self, id: &str) -> Result<bool, PipelineError>;
    async fn mark_processing(&self, id: &str, dest_path: &str) -> Result<bool, PipelineError>;
    async fn mark_published(&self, id: &str, published_url: &str) -> Result<bool, PipelineError>;
    async fn mark_failed(&self, id: &str, cause: &str) -> Result<bool, PipelineError>;
}

#[derive(Clone)]
pub struct PgJobStore {
    pool: DbPool,
}

impl PgJobStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn get(&self, id: &str) -> Result<Option<VideoJob>, PipelineError> {
        let job = sqlx::query_as::<_, VideoJob>("SELECT * FROM video_jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    async fn upsert_validating(
        &self,
        id: &str,
        source_path: &str,
        duration_sec: Option<f64>,
        height_px: Option<i32>,
        violations: ViolationSet,
    ) -> Result<VideoJob, PipelineError> {
        let job = sqlx::query_as::<_, VideoJob>(
            r#"
            INSERT INTO video_jobs
                (id, state, source_path, duration_sec, height_px,
                 over_duration, over_resolution, mov_format, blocked)
            VALUES ($1, 'Validating', $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                duration_sec    = EXCLUDED.duration_sec,
                height_px       = EXCLUDED.height_px,
                over_duration   = EXCLUDED.over_duration,
                over_resolution = EXCLUDED.over_resolution,
                mov_format      = EXCLUDED.mov_format,
                blocked         = EXCLUDED.blocked,
                updated_at      = NOW()
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(source_path)
        .bind(duration_sec)
        .bind(height_px)
        .bind(violations.over_duration)
        .bind(violations.over_resolution)
        .bind(violations.mov_format)
        .bind(violations.blocked())
        .fetch_one(&self.pool)
        .await?;

        Ok(job)
    }

    async fn record_warning(&self, id: &str, source_path: &str) -> Result<(), PipelineError> {
        sqlx::query(
            r#"
            INSERT INTO video_jobs (id, state, source_path, mov_format)
            VALUES ($1, 'Published', $2, TRUE)
            ON CONFLICT (id) DO UPDATE SET
                mov_format = TRUE,
                updated_at = NOW()
            "#,
        )
        .bind(id)
        .bind(source_path)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn mark_blocked(&self, id: &str) -> Result<bool, PipelineError> {
        let result = sqlx::query(
            r#"
            UPDATE video_jobs
            SET state = 'Blocked', blocked = TRUE, updated_at = NOW()
            WHERE id = $1 AND state = 'Validating'
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn mark_processing(&self, id: &str, dest_path: &str) -> Result<bool, PipelineError> {
        let result = sqlx::query(
            r#"
            UPDATE video_jobs
            SET state = 'Processing', dest_path = $2, updated_at = NOW()
            WHERE id = $1 AND state = 'Validating'
            "#,
        )
        .bind(id)
        .bind(dest_path)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn mark_published(&self, id: &str, published_url: &str) -> Result<bool, PipelineError> {
        let result = sqlx::query(
            r#"
            UPDATE video_jobs
            SET state = 'Published', published_url = $2, updated_at = NOW()
            WHERE id = $1 AND state = 'Processing'
            "#,
        )
        .bind(id)
        .bind(published_url)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn mark_failed(&self, id: &str, cause: &str) -> Result<bool, PipelineError> {
        let result = sqlx::query(
            r#"
            UPDATE video_jobs
            SET state = 'Failed', failure_cause = $2, updated_at = NOW()
            WHERE id = $1 AND state = 'Processing'
            "#,
        )
        .bind(id)
        .bind(cause)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
