use super::model::{JobState, VideoJob};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use utoipa::ToSchema;

/// Object-store finalize notification. Only `bucket` and `name` are
/// guaranteed; the nested custom metadata is uploader-supplied and optional.
#[derive(Debug, Deserialize, ToSchema)]
pub struct FinalizeEvent {
    pub bucket: String,
    pub name: String,
    #[serde(default)]
    pub metadata: ObjectMetadata,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ObjectMetadata {
    #[serde(default)]
    pub metadata: CustomMetadata,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomMetadata {
    // Custom object metadata arrives as strings on some stores and as
    // numbers on others; accept both.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub duration_sec: Option<f64>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub height: Option<i32>,
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }))
}

fn lenient_i32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }))
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub id: String,
    pub state: JobState,
    pub source_path: String,
    pub dest_path: Option<String>,
    pub duration_sec: Option<f64>,
    pub height_px: Option<i32>,
    pub over_duration: bool,
    pub over_resolution: bool,
    pub mov_format: bool,
    pub blocked: bool,
    pub published_url: Option<String>,
    pub failure_cause: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: OffsetDateTime,
}

impl From<VideoJob> for JobResponse {
    fn from(job: VideoJob) -> Self {
        let state = job.job_state();
        Self {
            id: job.id,
            state,
            source_path: job.source_path,
            dest_path: job.dest_path,
            duration_sec: job.duration_sec,
            height_px: job.height_px,
            over_duration: job.over_duration,
            over_resolution: job.over_resolution,
            mov_format: job.mov_format,
            blocked: job.blocked,
            published_url: job.published_url,
            failure_cause: job.failure_cause,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}
