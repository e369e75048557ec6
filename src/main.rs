use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing_subscriber::EnvFilter;

use oasis_leads::config::Config;
use oasis_leads::email::BrevoMailer;
use oasis_leads::leads::LeadLog;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env().expect("Failed to load configuration");

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    if !config.brevo_configured() {
        tracing::warn!("BREVO_API_KEY not set. Email sending will fail.");
    }

    let mailer = Arc::new(BrevoMailer::new(&config));
    let lead_log = LeadLog::open(&config.leads_file).expect("Failed to open leads file");

    let addr = SocketAddr::new(config.host, config.port);

    tracing::info!("Quote API server running on port {}", config.port);
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Email Provider: Brevo (Sendinblue)");
    tracing::info!("CORS allowed origins: {}", config.allowed_origins.join(", "));
    tracing::info!("From Email: {}", config.from_email);
    tracing::info!("To Email: {}", config.to_email);
    tracing::info!("Leads file: {}", config.leads_file.display());

    let app = oasis_leads::build_app(config, mailer, lead_log);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
