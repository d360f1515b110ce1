//! eventhub-gateway server entry point.
//!
//! Starts the Axum HTTP server after connecting to PostgreSQL and applying
//! migrations.

use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use eventhub_gateway::api;
use eventhub_gateway::app_state::AppState;
use eventhub_gateway::config::AppConfig;
use eventhub_gateway::notify::SmtpNotifier;
use eventhub_gateway::persistence::postgres::PgStore;
use eventhub_gateway::service::{AdminService, EventService, TicketService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting eventhub-gateway");

    // Connect to the record store and apply migrations
    let store = PgStore::connect(
        &config.database_url,
        config.database_max_connections,
        config.database_min_connections,
        Duration::from_secs(config.database_connect_timeout_secs),
    )
    .await?;
    store.run_migrations().await?;

    // Build the notifier once and inject it into the allocation service
    let notifier = SmtpNotifier::new(config.mail.clone());
    if !config.mail.enabled {
        tracing::warn!("SMTP_HOST not configured; ticket confirmations are disabled");
    }

    // Build application state
    let app_state = AppState {
        tickets: Arc::new(TicketService::new(store.clone(), notifier)),
        events: Arc::new(EventService::new(store.clone())),
        admin: Arc::new(AdminService::new(store.clone())),
        store,
    };

    // Build router
    let app = api::build_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
