use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinError;
use tracing::{info, warn};

use netadmin_vlan::{FileVlanStore, VlanStore};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::AppState;
use crate::router::build_router;

/// Network administration API server.
pub struct NetAdminServer {
    config: ServerConfig,
    state: AppState,
}

impl NetAdminServer {
    /// Open the store at `config.store_path` and build the server.
    ///
    /// Fails if the store file cannot be loaded or holds an invalid record.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let store = FileVlanStore::open(&config.store_path)?;
        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Build the server over an existing store.
    pub fn with_store(config: ServerConfig, store: Arc<dyn VlanStore>) -> Self {
        Self {
            config,
            state: AppState::new(store),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone(), &self.config)
    }

    /// Serve until SIGINT or SIGTERM.
    pub async fn serve(self) -> ServerResult<()> {
        self.serve_with_shutdown(shutdown_signal()).await
    }

    /// Bind `config.bind_addr` and serve until `signal` completes.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve_on(listener, signal).await
    }

    /// Serve on an already-bound listener until `signal` completes.
    ///
    /// After the signal, new connections are refused and in-flight requests
    /// get `shutdown_grace_secs` to finish. Past that the server returns
    /// without waiting for the stragglers.
    pub async fn serve_on<F>(self, listener: TcpListener, signal: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        info!(
            %addr,
            store = %self.config.store_path.display(),
            "API server listening"
        );

        let drain = Arc::new(Notify::new());
        let server = axum::serve(listener, self.router()).with_graceful_shutdown({
            let drain = Arc::clone(&drain);
            async move { drain.notified().await }
        });
        let mut task = tokio::spawn(async move { server.await });

        tokio::select! {
            joined = &mut task => return flatten(joined),
            () = signal => {}
        }

        let grace = self.config.shutdown_grace();
        info!(grace_secs = grace.as_secs(), "shutting down gracefully");
        drain.notify_one();

        match tokio::time::timeout(grace, &mut task).await {
            Ok(joined) => {
                flatten(joined)?;
                info!("API server shutdown complete");
                Ok(())
            }
            Err(_) => {
                warn!("in-flight requests did not finish in time; forcing shutdown");
                task.abort();
                Ok(())
            }
        }
    }
}

fn flatten(joined: Result<std::io::Result<()>, JoinError>) -> ServerResult<()> {
    joined
        .map_err(|e| ServerError::Internal(e.to_string()))?
        .map_err(ServerError::from)
}

/// Completes on Ctrl+C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    info!("shutdown signal received");
}
