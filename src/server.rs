//! HTTP control plane: the context-tree listener and the AMF direct-connect
//! listener, served concurrently with shared graceful shutdown.

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::nodes::ApiSet;
use tokio::net::TcpListener;
use tracing::{info, warn};

mod amf;
mod routes;

pub use amf::{amf_router, AmfState};
pub use routes::{router, AppState};

/// Binds both listeners and serves until a shutdown signal arrives.
pub async fn serve(config: &ServerConfig, apis: ApiSet) -> Result<(), ServerError> {
    let timeout = config.exec_timeout();
    let app = router(AppState::new(apis.clone(), timeout));
    let amf_app = amf_router(AmfState::new(apis, timeout));

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| ServerError::Bind {
            addr: addr.clone(),
            source: e,
        })?;
    let amf_addr = config.amf_bind_addr();
    let amf_listener = TcpListener::bind(&amf_addr)
        .await
        .map_err(|e| ServerError::Bind {
            addr: amf_addr.clone(),
            source: e,
        })?;

    info!(%addr, "context API listening");
    info!(%amf_addr, "AMF direct API listening");

    let api = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());
    let amf = axum::serve(amf_listener, amf_app).with_graceful_shutdown(shutdown_signal());
    tokio::try_join!(async { api.await }, async { amf.await })?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        warn!("failed to install shutdown signal handler");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
