//! Karlin Mail API Server
//!
//! Relays contact-form enquiries from the Karlin Pharmaceuticals website to the
//! company inbox through a transactional-email provider (Brevo HTTP API or SMTP).
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod error;
mod extract;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{BrevoRelay, SmtpRelay};
use app::{RateLimiter, RelayService};
use config::{AllowedOrigins, Config, TransportConfig};
use domain::ports::EmailRelay;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub relay_service: Arc<RelayService>,
    pub trust_proxy: bool,
}

/// Build the router with all routes and middleware
pub fn build_router(state: AppState, origins: &AllowedOrigins) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/api/send-email", post(handlers::send_email))
        // Middleware
        .layer(cors_layer(origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &AllowedOrigins) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    match origins {
        AllowedOrigins::Any => layer.allow_origin(Any),
        AllowedOrigins::List(list) => layer.allow_origin(AllowOrigin::list(list.iter().cloned())),
    }
}

async fn build_relay(config: &Config) -> anyhow::Result<Arc<dyn EmailRelay>> {
    match &config.transport {
        TransportConfig::Brevo(brevo) => {
            tracing::info!(api_url = %brevo.api_url, "Using Brevo HTTP API transport");
            let relay = BrevoRelay::new(brevo, &config.mailbox, config.relay_timeout)
                .context("Failed to build Brevo client")?;
            Ok(Arc::new(relay))
        }
        TransportConfig::Smtp(smtp) => {
            tracing::info!(host = %smtp.host, port = smtp.port, "Using SMTP transport");
            let relay = SmtpRelay::new(smtp, &config.mailbox, config.relay_timeout)
                .context("Failed to build SMTP transport")?;

            // Startup check only; a failing relay host should not keep the API down
            match relay.verify().await {
                Ok(true) => tracing::info!("SMTP server is ready to send emails"),
                Ok(false) => tracing::warn!("SMTP server did not accept the connection check"),
                Err(e) => tracing::warn!(error = %e, "SMTP connection check failed"),
            }
            Ok(Arc::new(relay))
        }
    }
}

/// Periodically drop expired rate-limit windows
fn spawn_limiter_pruning(limiter: Arc<RateLimiter>) {
    let every = limiter.window().max(Duration::from_secs(60));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let dropped = limiter.prune();
            if dropped > 0 {
                tracing::debug!(dropped, "Pruned expired rate-limit windows");
            }
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,karlin_mail_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Karlin Mail API...");

    // Load configuration
    let config = Config::from_env().context("Invalid configuration")?;

    // Create adapters
    let relay = build_relay(&config).await?;

    let limiter = Arc::new(RateLimiter::new(
        config.rate_limit.max_requests,
        config.rate_limit.window,
    ));
    spawn_limiter_pruning(limiter.clone());

    // Create application services
    let relay_service = Arc::new(RelayService::new(relay, limiter, config.environment));

    let state = AppState {
        relay_service,
        trust_proxy: config.trust_proxy,
    };

    let app = build_router(state, &config.allowed_origins);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(
        %addr,
        recipient = %config.mailbox.recipient,
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window.as_secs(),
        "Listening"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
