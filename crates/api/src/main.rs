use anyhow::Context;

use dancu_infra::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dancu_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let app = dancu_api::app::build_app(&config).await;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        dispatch = ?config.dispatch_mode,
        "listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
