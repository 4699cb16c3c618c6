use crate::modules::transcode::dto::{TranscodeRequest, TranscodeResponse};
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use tracing::error;
use validator::Validate;

// Wire contract predates this service: 200 {ok:true}, 400/500 {error}.
#[utoipa::path(
    post,
    path = "/transcode",
    request_body = TranscodeRequest,
    responses(
        (status = 200, description = "Destination artifact stored", body = TranscodeResponse),
        (status = 400, description = "bucket/src/dest required"),
        (status = 500, description = "Encoder or storage failure")
    ),
    tag = "Transcode"
)]
pub async fn transcode(
    State(state): State<AppState>,
    Json(req): Json<TranscodeRequest>,
) -> impl IntoResponse {
    if req.validate().is_err() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "bucket/src/dest required" })),
        )
            .into_response();
    }

    match state.transcode.transcode(&req).await {
        Ok(()) => Json(TranscodeResponse { ok: true }).into_response(),
        Err(e) => {
            error!("❌ Transcode of {} failed: {}", req.src, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
