use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use utoipa::ToSchema;

/// Lifecycle of one submitted video. Transitions only move forward:
/// `Uploaded < Validating < {Blocked | Processing} < {Published | Failed}`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
pub enum JobState {
    Uploaded,
    Validating,
    Blocked,
    Processing,
    Published,
    Failed,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Uploaded => "Uploaded",
            JobState::Validating => "Validating",
            JobState::Blocked => "Blocked",
            JobState::Processing => "Processing",
            JobState::Published => "Published",
            JobState::Failed => "Failed",
        }
    }

    /// Position in the forward-only partial order. Blocked/Processing share a
    /// rank (they fork from Validating), as do the two terminal states.
    pub fn rank(&self) -> u8 {
        match self {
            JobState::Uploaded => 0,
            JobState::Validating => 1,
            JobState::Blocked | JobState::Processing => 2,
            JobState::Published | JobState::Failed => 3,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Blocked | JobState::Published | JobState::Failed)
    }
}

impl From<String> for JobState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Uploaded" => JobState::Uploaded,
            "Blocked" => JobState::Blocked,
            "Processing" => JobState::Processing,
            "Published" => JobState::Published,
            "Failed" => JobState::Failed,
            _ => JobState::Validating,
        }
    }
}

/// Policy violations observed on a source video. Duration and resolution
/// violations block publication; a quicktime container is only a warning.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ViolationSet {
    pub over_duration: bool,
    pub over_resolution: bool,
    pub mov_format: bool,
}

impl ViolationSet {
    pub fn blocked(&self) -> bool {
        self.over_duration || self.over_resolution
    }

    pub fn is_empty(&self) -> bool {
        !self.over_duration && !self.over_resolution && !self.mov_format
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct VideoJob {
    pub id: String,
    pub state: String, // Stored as string in DB
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
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl VideoJob {
    pub fn job_state(&self) -> JobState {
        JobState::from(self.state.clone())
    }

    pub fn violations(&self) -> ViolationSet {
        ViolationSet {
            over_duration: self.over_duration,
            over_resolution: self.over_resolution,
            mov_format: self.mov_format,
        }
    }
}
