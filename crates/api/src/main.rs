use std::sync::Arc;

use anyhow::Context;

use taskdeck_api::AppConfig;
use taskdeck_auth::UserDirectory;
use taskdeck_jobs::LogMailer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    taskdeck_observability::init();

    let cfg = AppConfig::from_env();

    let users = Arc::new(UserDirectory::new());
    let seed_user = std::env::var("SEED_USER").unwrap_or_else(|_| {
        tracing::warn!("SEED_USER not set; registering dev default 'demo'");
        "demo".to_string()
    });
    let seed_password = std::env::var("SEED_PASSWORD").unwrap_or_else(|_| "demo".to_string());
    users.register(seed_user, seed_password);

    let app = taskdeck_api::app::build_app(cfg, users, Arc::new(LogMailer));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
