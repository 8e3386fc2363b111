//! Process host: binds the listener, serves the router, drains on shutdown.

use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use tinyledger_ledger::SharedLedger;

use crate::app;
use crate::config::Config;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("failed to read local address: {0}")]
    LocalAddr(#[source] std::io::Error),

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    #[error("in-flight requests did not finish within {0:?}")]
    ShutdownTimeout(Duration),
}

/// Owns the ledger and the router for the lifetime of the process.
pub struct Server {
    config: Config,
    ledger: SharedLedger,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self::with_ledger(config, SharedLedger::new())
    }

    pub fn with_ledger(config: Config, ledger: SharedLedger) -> Self {
        Self { config, ledger }
    }

    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    pub async fn bind(self) -> Result<BoundServer, ServerError> {
        let addr = self.config.addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        Ok(BoundServer {
            listener,
            router: app::build_app(self.ledger),
            shutdown_grace: self.config.shutdown_grace,
        })
    }

    /// Bind and serve until `shutdown` resolves, then drain.
    pub async fn run<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        self.bind().await?.serve(shutdown).await
    }
}

/// A server whose listener is already bound; useful when binding port 0.
pub struct BoundServer {
    listener: TcpListener,
    router: Router,
    shutdown_grace: Duration,
}

impl BoundServer {
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.listener.local_addr().map_err(ServerError::LocalAddr)
    }

    /// Serve until `shutdown` resolves. After that no new connections are
    /// accepted and in-flight requests get `shutdown_grace` to complete.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        let addr = self.local_addr()?;
        let (drain_tx, drain_rx) = oneshot::channel::<()>();

        let serving = axum::serve(self.listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = drain_rx.await;
            })
            .into_future();
        tokio::pin!(serving);
        tokio::pin!(shutdown);

        tracing::info!(%addr, "listening");

        tokio::select! {
            result = &mut serving => return result.map_err(ServerError::Serve),
            _ = &mut shutdown => {}
        }

        tracing::info!(grace = ?self.shutdown_grace, "shutdown requested, draining in-flight requests");
        let _ = drain_tx.send(());

        match tokio::time::timeout(self.shutdown_grace, serving).await {
            Ok(result) => result.map_err(ServerError::Serve),
            Err(_) => {
                tracing::warn!(grace = ?self.shutdown_grace, "graceful shutdown timed out");
                Err(ServerError::ShutdownTimeout(self.shutdown_grace))
            }
        }
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl-c"),
        _ = terminate => tracing::info!("received SIGTERM"),
    }
}
