use log::{error, info};
use photoserver::main_module::{bootstrap_app_state, run_axum_server};
use photoserver::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting photoserver {}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::from_env()?;
    let app_state = bootstrap_app_state(config).await?;

    if let Err(e) = run_axum_server(app_state).await {
        error!("Server stopped with error: {}", e);
        return Err(e.into());
    }

    info!("Server stopped");
    Ok(())
}
