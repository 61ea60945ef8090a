//! QuickPoll Server - Binary Entry Point

use std::env;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use quickpoll::api::http::create_router;
use quickpoll::api::state::AppState;
use quickpoll::realtime::run_heartbeat;
use quickpoll::store::PollStore;

/// Server settings read from the environment
struct ServerConfig {
    /// Listen address (QUICKPOLL_ADDR, default 0.0.0.0:8000)
    addr: String,
    /// Data file path (QUICKPOLL_DATA); in-memory only when unset
    data_path: Option<String>,
    /// Heartbeat period in seconds (QUICKPOLL_HEARTBEAT_SECS, default 30)
    heartbeat_secs: u64,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            addr: env::var("QUICKPOLL_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            data_path: env::var("QUICKPOLL_DATA").ok(),
            heartbeat_secs: env::var("QUICKPOLL_HEARTBEAT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env();

    let store = match &config.data_path {
        Some(path) => {
            info!("loading store from {}", path);
            Arc::new(PollStore::open(path)?)
        }
        None => {
            info!("no QUICKPOLL_DATA set, running with in-memory store");
            Arc::new(PollStore::in_memory())
        }
    };

    let state = Arc::new(AppState::new(store));

    tokio::spawn(run_heartbeat(
        state.dispatcher.clone(),
        Duration::from_secs(config.heartbeat_secs),
    ));

    let app = create_router(Arc::clone(&state));
    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    info!("QuickPoll listening on {}", config.addr);

    axum::serve(listener, app).await?;
    Ok(())
}
