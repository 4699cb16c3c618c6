use crate::common::error::PipelineError;
use crate::common::response::{ApiResponse, ApiSuccess};
use crate::modules::quota::dto::{SubmissionRequest, SubmissionResponse};
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use time::OffsetDateTime;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/v1/submissions",
    request_body = SubmissionRequest,
    responses(
        (status = 200, description = "Submission admitted", body = ApiResponse<SubmissionResponse>),
        (status = 400, description = "Invalid input"),
        (status = 429, description = "Monthly upload limit reached")
    ),
    tag = "Quota"
)]
pub async fn admit_submission(
    State(state): State<AppState>,
    Json(req): Json<SubmissionRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return PipelineError::InvalidRequest(e.to_string()).into_response();
    }

    match state.quota.admit(&req.uploader_id, OffsetDateTime::now_utc()).await {
        Ok(admission) => ApiSuccess(
            ApiResponse::success(
                SubmissionResponse { count: admission.count, limit: admission.limit },
                "Submission admitted",
            ),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => e.into_response(),
    }
}
