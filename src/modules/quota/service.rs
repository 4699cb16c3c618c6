use super::model::{MONTHLY_UPLOAD_LIMIT, counter_key};
use super::repository::QuotaStore;
use crate::common::error::PipelineError;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::info;

#[derive(Debug, PartialEq, Eq)]
pub struct Admission {
    pub count: i32,
    pub limit: i32,
}

#[derive(Clone)]
pub struct QuotaService {
    store: Arc<dyn QuotaStore>,
}

impl QuotaService {
    pub fn new(store: Arc<dyn QuotaStore>) -> Self {
        Self { store }
    }

    /// Admits one submission for `uploader_id` in the period containing
    /// `now`, or fails with ResourceExhausted once the monthly cap is hit.
    pub async fn admit(
        &self,
        uploader_id: &str,
        now: OffsetDateTime,
    ) -> Result<Admission, PipelineError> {
        let uploader_id = uploader_id.trim();
        if uploader_id.is_empty() {
            return Err(PipelineError::InvalidRequest("uploaderId is required".to_string()));
        }

        let key = counter_key(uploader_id, now);
        match self.store.try_increment(&key, MONTHLY_UPLOAD_LIMIT).await? {
            Some(count) => {
                info!("Admitted submission {}/{} for {}", count, MONTHLY_UPLOAD_LIMIT, key);
                Ok(Admission { count, limit: MONTHLY_UPLOAD_LIMIT })
            }
            None => Err(PipelineError::ResourceExhausted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use time::macros::datetime;

    /// In-memory ledger honoring the same atomic contract as the Postgres
    /// statement: check and increment under one lock.
    struct MemQuotaStore {
        counters: Mutex<HashMap<String, i32>>,
    }

    impl MemQuotaStore {
        fn new() -> Self {
            Self { counters: Mutex::new(HashMap::new()) }
        }
    }

    #[async_trait]
    impl QuotaStore for MemQuotaStore {
        async fn try_increment(&self, key: &str, limit: i32) -> Result<Option<i32>, PipelineError> {
            let mut counters = self.counters.lock().unwrap();
            let count = counters.entry(key.to_string()).or_insert(0);
            if *count >= limit {
                return Ok(None);
            }
            *count += 1;
            Ok(Some(*count))
        }
    }

    fn service() -> QuotaService {
        QuotaService::new(Arc::new(MemQuotaStore::new()))
    }

    const NOW: OffsetDateTime = datetime!(2026-08-23 12:00 UTC);

    #[tokio::test]
    async fn admits_up_to_the_cap_then_rejects() {
        let svc = service();

        for expected in 1..=MONTHLY_UPLOAD_LIMIT {
            let admission = svc.admit("user-1", NOW).await.unwrap();
            assert_eq!(admission.count, expected);
        }

        let over = svc.admit("user-1", NOW).await;
        assert!(matches!(over, Err(PipelineError::ResourceExhausted)));
    }

    #[tokio::test]
    async fn concurrent_admissions_grant_exactly_the_cap() {
        let svc = Arc::new(service());

        let mut handles = Vec::new();
        for _ in 0..25 {
            let svc = svc.clone();
            handles.push(tokio::spawn(async move { svc.admit("user-1", NOW).await }));
        }

        let mut admitted = 0;
        let mut exhausted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => admitted += 1,
                Err(PipelineError::ResourceExhausted) => exhausted += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(admitted, MONTHLY_UPLOAD_LIMIT);
        assert_eq!(exhausted, 25 - MONTHLY_UPLOAD_LIMIT);
    }

    #[tokio::test]
    async fn quota_is_scoped_per_uploader_and_period() {
        let svc = service();

        for _ in 0..MONTHLY_UPLOAD_LIMIT {
            svc.admit("user-1", NOW).await.unwrap();
        }
        assert!(svc.admit("user-1", NOW).await.is_err());

        // Another uploader is unaffected.
        assert!(svc.admit("user-2", NOW).await.is_ok());

        // A new month resets the window.
        let september = datetime!(2026-09-01 00:00 UTC);
        assert_eq!(svc.admit("user-1", september).await.unwrap().count, 1);
    }

    #[tokio::test]
    async fn blank_uploader_is_invalid() {
        let svc = service();
        let result = svc.admit("   ", NOW).await;
        assert!(matches!(result, Err(PipelineError::InvalidRequest(_))));
    }
}
