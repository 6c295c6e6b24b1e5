//! Password validation service used by the form before it submits.

use std::{io, net::SocketAddr, sync::Arc};

use axum::{routing::get, Router};
use log::{error, info};
use tokio::{net::TcpListener, signal};

pub mod error;
pub mod routes;

use crate::config::Config;
use routes::{liveness_handler, validate_handler, validate_usage_handler};

pub fn router(config: Arc<Config>) -> Router {
    Router::new()
        .route("/validate", get(validate_usage_handler).post(validate_handler))
        .route("/test", get(liveness_handler))
        .with_state(config)
}

pub async fn serve(config: Config) -> io::Result<()> {
    let address = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = router(Arc::new(config));

    info!("Binding to {address}");
    let listener = TcpListener::bind(address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(err) => {
                error!("Failed to install Ctrl+C handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                error!("Failed to install signal handler: {err}");
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
}
