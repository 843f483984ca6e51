use folio::backend::supabase::SupabaseClient;
use folio::config::{self, LogFormat};
use folio::state::AppState;
use folio::web;

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists
    if let Err(e) = dotenvy::dotenv() {
        println!("No .env file found, using environment variables: {}", e);
    }

    let settings = config::get_settings();
    init_tracing(settings.log_format);

    info!("Starting {} v{}...", settings.app_name, settings.version);

    if settings.supabase_anon_key.is_empty() {
        warn!("SUPABASE_ANON_KEY is not set; requests to the backend will be rejected");
    }

    let client = SupabaseClient::from_settings(settings)?;
    info!(
        "Using backend at {} (table {})",
        settings.supabase_url, settings.projects_table
    );

    let app = web::router(AppState::from_supabase(client));

    let addr: SocketAddr = settings.address().parse()?;
    info!("{} started on http://{}", settings.app_name, addr);

    // Start server with graceful shutdown
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("folio=info,tower_http=info"));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down...");
}
