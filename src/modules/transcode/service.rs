use super::dto::TranscodeRequest;
use crate::common::error::PipelineError;
use crate::infrastructure::storage::s3::StorageService;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::info;
use uuid::Uuid;

/// Per-invocation scratch workspace. Each transcode gets its own directory
/// keyed by a fresh attempt id, so concurrent jobs on one instance can never
/// clobber each other's temp files. Removed on drop, whichever way the
/// invocation exits.
struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    fn create(attempt_id: &str) -> std::io::Result<Self> {
        let path = std::env::temp_dir().join(format!("transcode-{}", attempt_id));
        std::fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// Fixed encode profile: 720p proportional, 30fps, H.264 ~2.5Mbps veryfast,
/// AAC 128k.
fn ffmpeg_args(input: &Path, output: &Path) -> Vec<String> {
    let mut args: Vec<String> = vec!["-y".to_string(), "-i".to_string()];
    args.push(input.to_string_lossy().into_owned());
    for fixed in [
        "-vf", "scale=-2:720", "-r", "30", "-c:v", "libx264", "-preset", "veryfast", "-b:v",
        "2500k", "-c:a", "aac", "-b:a", "128k",
    ] {
        args.push(fixed.to_string());
    }
    args.push(output.to_string_lossy().into_owned());
    args
}

#[derive(Clone)]
pub struct TranscodeService {
    storage: StorageService,
}

impl TranscodeService {
    pub fn new(storage: StorageService) -> Self {
        Self { storage }
    }

    /// Download -> encode -> upload. Nothing is uploaded unless the encode
    /// succeeded; success is returned only after the destination object is
    /// durably stored.
    pub async fn transcode(&self, req: &TranscodeRequest) -> Result<(), PipelineError> {
        let attempt_id = Uuid::new_v4().simple().to_string();
        let scratch = ScratchDir::create(&attempt_id)?;
        let input = scratch.join("input");
        let output = scratch.join("output.mp4");

        info!("⬇️ Downloading s3://{}/{}", req.bucket, req.src);
        let source = self
            .storage
            .download(&req.bucket, &req.src)
            .await
            .map_err(|e| PipelineError::TranscodeFailure(format!("download failed: {:#}", e)))?;
        tokio::fs::write(&input, &source).await?;

        info!("🎞️ Encoding {} ({} bytes)", req.src, source.len());
        let status = Command::new("ffmpeg")
            .args(ffmpeg_args(&input, &output))
            .status()
            .await?;
        if !status.success() {
            return Err(PipelineError::TranscodeFailure(format!(
                "ffmpeg exited with {}",
                status
            )));
        }

        let encoded = tokio::fs::read(&output).await?;
        info!("⬆️ Uploading s3://{}/{} ({} bytes)", req.bucket, req.dest, encoded.len());
        self.storage
            .upload(&req.bucket, &req.dest, encoded.into(), "video/mp4")
            .await
            .map_err(|e| PipelineError::TranscodeFailure(format!("upload failed: {:#}", e)))?;

        Ok(())
    }
}
