use crate::common::error::PipelineError;
use crate::infrastructure::db::pool::DbPool;
use async_trait::async_trait;

/// Quota Ledger seam. `try_increment` must be atomic: two callers racing on
/// the last slot must never both succeed. Returns the new count, or None when
/// the cap is already reached (in which case nothing is mutated).
#[async_trait]
pub trait QuotaStore: Send + Sync {
    async fn try_increment(&self, key: &str, limit: i32) -> Result<Option<i32>, PipelineError>;
}

#[derive(Clone)]
pub struct PgQuotaStore {
    pool: DbPool,
}

impl PgQuotaStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuotaStore for PgQuotaStore {
    async fn try_increment(&self, key: &str, limit: i32) -> Result<Option<i32>, PipelineError> {
        // Single-statement read-check-write: the row lock taken by the upsert
        // serializes concurrent callers, and the WHERE guard makes the loser
        // of the last slot come back empty-handed instead of overshooting.
        let count: Option<(i32,)> = sqlx::query_as(
            r#"
            INSERT INTO quota_counters (key, count) VALUES ($1, 1)
            ON CONFLICT (key) DO UPDATE SET
                count      = quota_counters.count + 1,
                updated_at = NOW()
            WHERE quota_counters.count < $2
            RETURNING count
            "#,
        )
        .bind(key)
        .bind(limit)
        .fetch_optional(&self.pool)
        .await?;

        Ok(count.map(|(c,)| c))
    }
}
