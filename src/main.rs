use dotenvy::dotenv;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod modules;
mod routes;
mod state;

use config::settings::AppConfig;
use infrastructure::db::pool::connect_to_db;
use infrastructure::storage::s3::StorageService;
use infrastructure::transcoder::client::TranscoderClient;
use modules::pipeline::repository::PgJobStore;
use modules::pipeline::service::PipelineService;
use modules::quota::repository::PgQuotaStore;
use modules::quota::service::QuotaService;
use modules::transcode::service::TranscodeService;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt::init();

    info!("Starting server...");

    let config = AppConfig::new()?;

    let db = connect_to_db(&config.database_url).await?;
    sqlx::migrate!().run(&db).await?;

    let storage = StorageService::new(
        &config.minio_url,
        &config.minio_access_key,
        &config.minio_secret_key,
    )
    .await;

    let quota = QuotaService::new(Arc::new(PgQuotaStore::new(db.clone())));
    let transcoder = TranscoderClient::new(
        &config.transcoder_url,
        Duration::from_secs(config.transcode_timeout_secs),
    );
    let pipeline = PipelineService::new(
        Arc::new(PgJobStore::new(db.clone())),
        Arc::new(transcoder),
    );
    let transcode = TranscodeService::new(storage);

    let state = AppState::new(config, quota, pipeline, transcode);
    let port = state.config.server_port;
    let app = app::create_app(state).await;

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Server running on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
