use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::quota::handler::admit_submission,
        crate::modules::pipeline::handler::object_finalized,
        crate::modules::pipeline::handler::get_job,
        crate::modules::transcode::handler::transcode,
    ),
    components(
        schemas(
            crate::modules::quota::dto::SubmissionRequest,
            crate::modules::quota::dto::SubmissionResponse,
            crate::modules::pipeline::dto::FinalizeEvent,
            crate::modules::pipeline::dto::ObjectMetadata,
            crate::modules::pipeline::dto::CustomMetadata,
            crate::modules::pipeline::dto::JobResponse,
            crate::modules::pipeline::model::JobState,
            crate::modules::pipeline::service::FinalizeOutcome,
            crate::modules::transcode::dto::TranscodeRequest,
            crate::modules::transcode::dto::TranscodeResponse,
        )
    ),
    tags(
        (name = "Quota", description = "Submission quota admission"),
        (name = "Pipeline", description = "Video job lifecycle"),
        (name = "Transcode", description = "Transcode worker surface")
    )
)]
pub struct ApiDoc;
