use crate::common::response::{ApiResponse, ApiSuccess};
use crate::modules::pipeline::dto::{FinalizeEvent, JobResponse};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

#[utoipa::path(
    post,
    path = "/events/finalize",
    request_body = FinalizeEvent,
    responses(
        (status = 200, description = "Event processed (possibly ignored)", body = ApiResponse<crate::modules::pipeline::service::FinalizeOutcome>),
        (status = 500, description = "Job store unavailable, event should be redelivered")
    ),
    tag = "Pipeline"
)]
pub async fn object_finalized(
    State(state): State<AppState>,
    Json(event): Json<FinalizeEvent>,
) -> impl IntoResponse {
    let observed = &event.metadata.metadata;
    match state
        .pipeline
        .handle_finalize(&event.bucket, &event.name, observed.duration_sec, observed.height)
        .await
    {
        Ok(outcome) => ApiSuccess(
            ApiResponse::success(outcome, "Finalize event processed"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/jobs/{id}",
    params(
        ("id" = String, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Get Job", body = ApiResponse<JobResponse>),
        (status = 404, description = "Job Not Found")
    ),
    tag = "Pipeline"
)]
pub async fn get_job(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    match state.pipeline.job(&id).await {
        Ok(job) => ApiSuccess(
            ApiResponse::success(JobResponse::from(job), "Job retrieved successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => e.into_response(),
    }
}
