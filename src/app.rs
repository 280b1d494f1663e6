use crate::config::AppSettings;
use crate::handler::{api_router, health_handler};
use crate::logging::{LoggingConfig, init_logging, request_logging_middleware};
use crate::storage::Storage;
use axum::{Router, middleware};
use sea_orm::DatabaseConnection;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

/// Full HTTP surface: `/ping`, `/health` and everything under `/api`.
pub fn router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .merge(health_handler::router(db.clone()))
        .nest("/api", api_router(db))
        .layer(middleware::from_fn(request_logging_middleware))
}

fn apply_server_layers(router: Router) -> Router {
    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = AppSettings::from_env()?;
    init_logging(&LoggingConfig::default().with_format(settings.log_format))?;

    let addr = settings.server.address()?;
    let storage = Storage::open(settings.storage_config()).await?;
    let app = apply_server_layers(router(storage.connection()));

    info!(%addr, "server starting on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    storage.close().await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to install Ctrl+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM signal handler");
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        _ = ctrl_c => "Ctrl+C",
        _ = terminate => "SIGTERM",
    };

    info!(signal, "shutdown signal received, starting graceful shutdown");
}
