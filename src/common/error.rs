use crate::common::response::ApiResponse;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Error taxonomy shared by the admission, orchestration and worker paths.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("monthly upload limit reached")]
    ResourceExhausted,

    #[error("{0} not found")]
    NotFound(String),

    #[error("transcode failed: {0}")]
    TranscodeFailure(String),

    #[error("transcode request timed out")]
    Timeout,

    #[error("storage error: {0}")]
    TransientStorage(String),
}

impl PipelineError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PipelineError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            PipelineError::ResourceExhausted => StatusCode::TOO_MANY_REQUESTS,
            PipelineError::NotFound(_) => StatusCode::NOT_FOUND,
            PipelineError::TranscodeFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PipelineError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            PipelineError::TransientStorage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Retryable faults: the job-record write helpers back off on these.
    pub fn is_transient(&self) -> bool {
        matches!(self, PipelineError::TransientStorage(_))
    }
}

impl From<sqlx::Error> for PipelineError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => PipelineError::NotFound("record".to_string()),
            other => PipelineError::TransientStorage(other.to_string()),
        }
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(e: std::io::Error) -> Self {
        PipelineError::TranscodeFailure(e.to_string())
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ApiResponse::<()>::error(&self.to_string());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admission_errors_map_to_distinct_statuses() {
        assert_eq!(
            PipelineError::InvalidRequest("uploaderId is required".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PipelineError::ResourceExhausted.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn pipeline_errors_map_to_server_side_statuses() {
        assert_eq!(
            PipelineError::Timeout.status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            PipelineError::TranscodeFailure("ffmpeg exited with 1".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            PipelineError::NotFound("job abc".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn only_storage_faults_are_transient() {
        assert!(PipelineError::TransientStorage("pool timed out".to_string()).is_transient());
        assert!(!PipelineError::Timeout.is_transient());
        assert!(!PipelineError::TranscodeFailure("boom".to_string()).is_transient());
        assert!(!PipelineError::ResourceExhausted.is_transient());
    }

    #[test]
    fn sqlx_row_not_found_becomes_not_found() {
        let e = PipelineError::from(sqlx::Error::RowNotFound);
        assert!(matches!(e, PipelineError::NotFound(_)));

        let e = PipelineError::from(sqlx::Error::PoolTimedOut);
        assert!(e.is_transient());
    }
}
