use crate::config::{AppConfig, Environment, ServerConfig};
use crate::error::{Error, Result};
use crate::http::{Request, Response};
use crate::routing::Router;
use hyper::service::{make_service_fn, service_fn};
use hyper::Server as HyperServer;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

/// hyper-backed listener feeding requests into a [`Router`]
pub struct Server {
    router: Arc<Router>,
    addr: Option<String>,
    environment: Environment,
    shutdown_timeout: Duration,
}

impl Server {
    pub fn new(router: Router) -> Self {
        Self {
            router: Arc::new(router),
            addr: None,
            environment: Environment::default(),
            shutdown_timeout: Duration::from_secs(ServerConfig::default().shutdown_timeout),
        }
    }

    /// Use the listen address and shutdown grace period from `config`
    pub fn from_config(router: Router, config: &AppConfig) -> Self {
        Self {
            router: Arc::new(router),
            addr: Some(config.server_address()),
            environment: config.environment.clone(),
            shutdown_timeout: Duration::from_secs(config.server.shutdown_timeout),
        }
    }

    /// How long in-flight requests may run once shutdown has started
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Run until SIGINT/SIGTERM. `addr` overrides the configured address.
    pub async fn serve(self, addr: Option<&str>) -> Result<()> {
        let addr = addr
            .map(str::to_string)
            .or(self.addr)
            .unwrap_or_else(|| AppConfig::default().server_address());
        let addr: SocketAddr = addr
            .parse()
            .map_err(|e| Error::internal(format!("Invalid address '{}': {}", addr, e)))?;

        log::info!(
            "Server listening on {} ({})",
            addr,
            self.environment.as_str()
        );

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let (draining_tx, draining_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            #[cfg(unix)]
            {
                use tokio::signal::unix::{signal, SignalKind};

                let mut sigterm = match signal(SignalKind::terminate()) {
                    Ok(sig) => sig,
                    Err(e) => {
                        log::error!("Failed to install SIGTERM handler: {}", e);
                        return;
                    }
                };

                tokio::select! {
                    _ = sigterm.recv() => {
                        log::info!("Received SIGTERM signal - initiating graceful shutdown");
                    }
                    _ = tokio::signal::ctrl_c() => {
                        log::info!("Received SIGINT signal (Ctrl+C) - initiating graceful shutdown");
                    }
                }
            }

            #[cfg(not(unix))]
            {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    log::error!("Failed to listen for Ctrl+C signal: {}", e);
                    return;
                }
                log::info!("Received Ctrl+C signal - initiating graceful shutdown");
            }

            let _ = shutdown_tx.send(());
        });

        let router = Arc::clone(&self.router);
        let make_svc = make_service_fn(move |_conn| {
            let router = Arc::clone(&router);
            async move {
                Ok::<_, Infallible>(service_fn(move |req| {
                    let router = Arc::clone(&router);
                    async move {
                        let response = match Request::from_hyper(req).await {
                            Ok(request) => router.handle_request(request),
                            Err(e) => {
                                log::error!("Failed to read request: {}", e);
                                Response::internal_error()
                            }
                        };
                        Ok::<_, Infallible>(response.into_hyper())
                    }
                }))
            }
        });

        let server = HyperServer::try_bind(&addr)?
            .serve(make_svc)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
                let _ = draining_tx.send(());
            });

        match drain_with_timeout(server, draining_rx, self.shutdown_timeout).await {
            Ok(true) => log::info!("Server stopped"),
            Ok(false) => log::warn!(
                "Shutdown timeout of {:?} elapsed, dropping in-flight requests",
                self.shutdown_timeout
            ),
            Err(e) => {
                log::error!("Server error: {}", e);
                return Err(Error::Http(e));
            }
        }
        Ok(())
    }
}

/// Drive `server` to completion, giving up `timeout` after `draining` fires.
///
/// Returns `Ok(false)` when the grace period ran out first.
async fn drain_with_timeout<F>(
    server: F,
    draining: oneshot::Receiver<()>,
    timeout: Duration,
) -> std::result::Result<bool, hyper::Error>
where
    F: Future<Output = std::result::Result<(), hyper::Error>>,
{
    tokio::pin!(server);

    let deadline = async {
        match draining.await {
            Ok(()) => tokio::time::sleep(timeout).await,
            // server finished without a shutdown signal
            Err(_) => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        result = &mut server => result.map(|_| true),
        _ = deadline => Ok(false),
    }
}
