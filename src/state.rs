use crate::config::settings::AppConfig;
use crate::modules::pipeline::service::PipelineService;
use crate::modules::quota::service::QuotaService;
use crate::modules::transcode::service::TranscodeService;

/// All collaborators are constructed once in main and injected; nothing in
/// the pipeline reaches for ambient global state.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub quota: QuotaService,
    pub pipeline: PipelineService,
    pub transcode: TranscodeService,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        quota: QuotaService,
        pipeline: PipelineService,
        transcode: TranscodeService,
    ) -> Self {
        Self {
            config,
            quota,
            pipeline,
            transcode,
        }
    }
}
