//! Planer checkout server.
//!
//! Loads configuration from `PLANER__*` environment variables, refuses to
//! start when any required key is missing and serves the checkout API.

use std::error::Error;
use std::sync::Arc;

use planer_checkout::adapters::email::SmtpMailer;
use planer_checkout::adapters::http::{checkout_router, CheckoutAppState};
use planer_checkout::adapters::yookassa::{YooKassaConfig, YooKassaPaymentGateway};
use planer_checkout::config::{AppConfig, LogFormat, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config.server);

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    }

    let gateway_config = YooKassaConfig::from_gateway_config(&config.gateway)
        .ok_or("Payment gateway credentials are not configured")?;
    let payment_gateway = Arc::new(YooKassaPaymentGateway::new(gateway_config)?);
    let mailer = Arc::new(SmtpMailer::from_config(&config.email)?);

    let addr = config.server.socket_addr()?;
    let config = Arc::new(config);
    let app = checkout_router(CheckoutAppState::new(
        config.clone(),
        payment_gateway,
        mailer,
    ));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        test_email = config.features.test_email_enabled,
        "Planer checkout listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// `RUST_LOG` overrides the configured filter. Production logs are JSON.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match server.log_format() {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
