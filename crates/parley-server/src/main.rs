mod bootstrap;
mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use parley_api::AppStateInner;
use parley_gateway::Dispatcher;
use parley_store::{MemoryStore, Repository};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "parley=debug,parley_api=debug,parley_gateway=debug,tower_http=debug".into()
            }),
        )
        .init();

    let config = ServerConfig::from_env()?;
    info!(
        "Config: {} client(s), timeout {:?}, max length {}, search {}, group chat {}",
        config.api.clients.len(),
        config.request_timeout,
        config.api.max_message_length,
        if config.api.enable_search { "on" } else { "off" },
        if config.api.enable_group_chat { "on" } else { "off" },
    );

    let dispatcher = Dispatcher::new();
    let store: Arc<dyn Repository> =
        Arc::new(MemoryStore::with_notifier(Arc::new(dispatcher.clone())));

    if config.seed_demo {
        bootstrap::seed_demo(store.as_ref())?;
        for (user_id, _, _) in bootstrap::DEMO_USERS {
            bootstrap::listen(&dispatcher, user_id);
        }
        bootstrap::listen(&dispatcher, bootstrap::DEMO_GROUP);
    } else {
        warn!("Demo data disabled, the store starts empty");
    }

    let state = AppStateInner::new(store, dispatcher, config.api.clone());
    let app = parley_api::router(state)
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Parley server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Could not install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
