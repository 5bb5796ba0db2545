//! Movie Rental Server
//!
//! REST API server for the movie catalog and rental ledger.

use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use movie_rental_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("movie_rental_server={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Movie Rental Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Using {:?} store", config.database.backend);

    let repository = Repository::connect(&config.database).await?;

    let services = Services::new(repository, config.auth.clone());
    services.seed(&config.seed).await?;

    let addr: SocketAddr = config.bind_address().parse()?;
    let app = api::router(AppState::new(config, services));

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
