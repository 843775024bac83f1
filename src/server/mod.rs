pub mod api;
pub mod error;
pub mod rate_limit;

use axum::Router;
use log::{ error, info };
use std::error::Error;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

pub use api::{ router, AppState };

/// How long in-flight HTTPS requests get to finish after a shutdown signal.
const TLS_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TlsPaths {
    pub cert_path: String,
    pub key_path: String,
}

pub struct Server {
    addr: SocketAddr,
    app: Router,
    tls: Option<TlsPaths>,
}

impl Server {
    pub fn new(addr: SocketAddr, app: Router, tls: Option<TlsPaths>) -> Self {
        Self { addr, app, tls }
    }

    pub async fn run(self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let service = self.app.into_make_service_with_connect_info::<SocketAddr>();

        match self.tls {
            Some(tls) => {
                info!(
                    "TLS enabled. Loading certificate from '{}' and key from '{}'",
                    tls.cert_path,
                    tls.key_path
                );
                let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                    &tls.cert_path,
                    &tls.key_path
                ).await?;

                let handle = axum_server::Handle::new();
                drain_on(handle.clone(), shutdown_signal());

                info!("HTTPS server listening on: https://{}", self.addr);
                axum_server::bind_rustls(self.addr, tls_config)
                    .handle(handle)
                    .serve(service)
                    .await?;
            }
            None => {
                let listener = tokio::net::TcpListener::bind(self.addr).await.map_err(|e| {
                    error!("Failed to bind HTTP server to {}: {}. Try a different port.", self.addr, e);
                    e
                })?;
                info!("HTTP server listening on: http://{}", self.addr);
                axum::serve(listener, service)
                    .with_graceful_shutdown(shutdown_signal())
                    .await?;
            }
        }

        Ok(())
    }
}

/// Starts a graceful shutdown of an `axum_server` listener once `signal` resolves.
fn drain_on<F>(handle: axum_server::Handle, signal: F)
    where F: Future<Output = ()> + Send + 'static
{
    tokio::spawn(async move {
        signal.await;
        handle.graceful_shutdown(Some(TLS_DRAIN_TIMEOUT));
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn handle_stops_listener_when_signal_fires() {
        let handle = axum_server::Handle::new();
        drain_on(handle.clone(), async {});

        let server = axum_server::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .handle(handle)
            .serve(Router::new().into_make_service());

        let result = tokio::time::timeout(Duration::from_secs(5), server).await;
        assert!(matches!(result, Ok(Ok(()))));
    }
}
