//! Application state initialization

use anyhow::{anyhow, Context};
use log::info;
use std::sync::Arc;

use crate::botmodels::RekognitionClient;
use crate::core::config::{AppConfig, StorageConfig};
use crate::core::shared::state::AppState;
use crate::core::shared::utils::{create_conn, run_migrations};
use crate::drive::build_image_store;

/// Connects the database, applies pending migrations and builds the
/// recognition client and image store.
pub async fn bootstrap_app_state(config: AppConfig) -> anyhow::Result<Arc<AppState>> {
    let conn = create_conn(&config.database_url).context("Failed to create database pool")?;
    run_migrations(&conn).map_err(|e| anyhow!("Failed to run migrations: {}", e))?;
    info!("Database ready");

    let recognizer = Arc::new(RekognitionClient::new(&config.recognition).await);
    info!(
        "Using Rekognition in {} with collection '{}'",
        config.recognition.region, config.recognition.collection_id
    );

    let store = build_image_store(&config.storage)
        .await
        .context("Failed to initialize image storage")?;
    match &config.storage {
        StorageConfig::Local(local) => info!("Storing photos in {}", local.root.display()),
        StorageConfig::S3(drive) => info!("Storing photos in bucket {} at {}", drive.bucket, drive.server),
    }

    Ok(Arc::new(AppState {
        config,
        conn,
        recognizer,
        store,
    }))
}
