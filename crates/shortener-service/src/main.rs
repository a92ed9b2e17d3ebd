use shortener_service::config::Config;
use shortener_service::handlers::AppState;
use shortener_service::middleware::AdminGateState;
use shortener_service::repositories::MemoryRepository;
use shortener_service::routes;
use shortener_service::services::SsoClient;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shortener_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting URL Shortener");

    // Load configuration
    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!("Configuration loaded successfully");

    // Establish the shared SSO channel (fail fast on startup)
    let sso = SsoClient::connect(&config.sso_address, config.sso_timeout, config.sso_retries)
        .await
        .map_err(|e| {
            error!("Failed to connect to SSO: {}", e);
            e
        })?;

    // Create application state
    let state = Arc::new(AppState {
        repository: Arc::new(MemoryRepository::new()),
        alias_length: config.alias_length,
    });
    let gate = Arc::new(AdminGateState {
        app_secret: config.app_secret.clone(),
        sso: Arc::new(sso),
    });

    // Build application routes
    let app = routes::build_routes(state, gate);

    // Parse bind address
    let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    info!("URL Shortener listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
