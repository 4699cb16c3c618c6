use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TranscodeRequest {
    #[validate(length(min = 1, message = "bucket is required"))]
    pub bucket: String,
    #[validate(length(min = 1, message = "src is required"))]
    pub src: String,
    #[validate(length(min = 1, message = "dest is required"))]
    pub dest: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TranscodeResponse {
    pub ok: bool,
}
