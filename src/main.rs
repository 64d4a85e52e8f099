use mpesa_gateway::{config::AppConfig, routes::build_router, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = AppConfig::from_env()?;
    info!("📱 Short code: {}", config.mpesa_short_code);
    info!("🌐 Environment: {}", config.mpesa_environment);
    tracing::debug!("Config: {}", config.get_config_info());

    let hostname = config.hostname.clone();
    let port = config.port;

    let app_state = AppState::new(config)?;
    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind((hostname.as_str(), port)).await?;
    info!("🚀 Server running at http://{}:{}", hostname, port);

    axum::serve(listener, app).await?;

    Ok(())
}
