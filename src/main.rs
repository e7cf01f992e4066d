use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use line_tracker_backend::config::Config;
use line_tracker_backend::git::RepoRegistry;
use line_tracker_backend::routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Get config path from args or use the default
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.json".to_string());

    tracing::info!("Loading configuration from: {}", config_path);

    let config = Config::load(&config_path)?;
    let registry = std::sync::Arc::new(RepoRegistry::from_config(&config)?);
    tracing::info!("Serving {} repositories", config.repos.len());

    // CORS configuration for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = Router::new()
        .merge(routes::create_router(registry))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start the server
    let addr = std::env::var("LINE_TRACKER_ADDR").unwrap_or_else(|_| "127.0.0.1:3001".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
