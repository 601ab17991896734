use anyhow::Context;

use workforce_api::app::{AppServices, build_app};
use workforce_auth::TokenConfig;
use workforce_infra::{AppConfig, Stores};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    workforce_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!(config = ?config, "configuration loaded");

    let stores = Stores::from_config(&config).await?;
    let tokens = TokenConfig::new(config.jwt_secret.clone()).with_ttl(config.token_ttl);
    let services = AppServices::new(stores, tokens);

    if let Some(admin) = &config.bootstrap_admin {
        services.seed_admin(admin).await?;
    }

    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
