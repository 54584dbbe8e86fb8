use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use parlance_api::config::ServerConfig;
use parlance_api::router::build_app_router;
use parlance_api::state::AppState;
use parlance_core::progress::{
    FileKeyValueStore, KeyValueProgressStore, MemoryKeyValueStore, ProgressLedger,
};
use parlance_llm::openai::OpenAiClient;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    let addr = SocketAddr::new(
        config.host.parse().expect("HOST must be an IP address"),
        config.port,
    );

    if config.openai.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; conversation calls will fail as unavailable");
    }
    let openai = Arc::new(OpenAiClient::new(config.openai.clone()));
    tracing::info!(
        base_url = %config.openai.base_url,
        chat_model = %config.openai.chat_model,
        transcription_model = %config.openai.transcription_model,
        "Upstream model client ready"
    );

    let state = AppState {
        config: Arc::new(config.clone()),
        llm: openai.clone(),
        stt: openai,
        progress: Arc::new(build_progress_ledger(&config)),
    };
    let app = build_app_router(state, &config);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "parlance listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "parlance_api=debug,parlance_core=info,parlance_llm=info,tower_http=debug".into()
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// File-backed ledger under `PROGRESS_DIR`, or an in-memory one when unset.
fn build_progress_ledger(config: &ServerConfig) -> ProgressLedger {
    match &config.progress_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "Persisting progress to disk");
            ProgressLedger::new(KeyValueProgressStore::new(FileKeyValueStore::new(dir)))
        }
        None => {
            tracing::warn!("PROGRESS_DIR is empty; progress is kept in memory only");
            ProgressLedger::new(KeyValueProgressStore::new(MemoryKeyValueStore::new()))
        }
    }
}

/// Wait for SIGINT (Ctrl-C) or SIGTERM (on Unix) to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
