//! # Device Registry Server
//!
//! The HTTP front of the device registry: `Axum` routes over one JSON registry document and a
//! directory of uploaded photos.
//!
//! ## Example
//! ```no_run
//! use devreg_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder().data_dir("data").port(3000).build().await?.run().await
//! }
//! ```

mod router;

use anyhow::{Context, Result};
use axum::Router;
use axum_server::Handle;
use axum_server::tls_rustls::RustlsConfig;
use devreg::domain::config::{ApiConfig, SslConfig};
use devreg::kernel::server::ApiState;
use devreg_storage::{NamespacedStorage, Storage};
use devreg_store::RegistryStore;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

/// How long in-flight requests may run once shutdown starts.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Configures and assembles a [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ServerBuilder {
    cfg: ApiConfig,
}

impl ServerBuilder {
    pub fn config(mut self, cfg: ApiConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.cfg.server.port = port;
        self
    }

    /// Directory holding the registry document and the uploads.
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cfg.storage.data_dir = dir.into();
        self
    }

    /// Opens the data directory, loads the registry document and wires every feature slice.
    ///
    /// # Errors
    /// * Configured TLS files are missing.
    /// * The data directory cannot be created, or the uploads name is not a plain name.
    /// * The registry document exists but cannot be read.
    pub async fn build(self) -> Result<Server> {
        if let Some(ssl) = &self.cfg.server.ssl {
            check_tls_files(ssl)?;
        }

        let (store, photos) = open_storage(&self.cfg).await?;
        let slices = devreg::init(&store, &photos);

        let state = ApiState::builder()
            .config(self.cfg)
            .store(store)
            .register_slices(slices)
            .build()
            .context("Failed to assemble API state")?;

        info!(slices = state.slice_ids().count(), "Server assembled");
        Ok(Server { state })
    }
}

fn check_tls_files(ssl: &SslConfig) -> Result<()> {
    for (what, path) in [("certificate", &ssl.cert), ("private key", &ssl.key)] {
        if !path.is_file() {
            anyhow::bail!("TLS {what} not found at {}", path.display());
        }
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if ssl.key.metadata()?.permissions().mode() & 0o077 != 0 {
            warn!(key = %ssl.key.display(), "TLS private key is readable by group or others");
        }
    }

    Ok(())
}

async fn open_storage(cfg: &ApiConfig) -> Result<(RegistryStore, NamespacedStorage)> {
    let storage = Storage::builder()
        .root(&cfg.storage.data_dir)
        .connect()
        .await
        .with_context(|| format!("Failed to open data directory {}", cfg.storage.data_dir.display()))?;

    let photos = storage.namespace(&cfg.storage.uploads).context("Invalid uploads directory name")?;

    let store = RegistryStore::open(storage, cfg.storage.registry_file.clone())
        .await
        .context("Failed to load the registry document")?;

    Ok((store, photos))
}

/// An assembled server, ready to listen.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    state: ApiState,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// The complete application router, middleware included.
    pub fn app(&self) -> Router {
        router::init(self.state.clone())
    }

    #[must_use]
    pub const fn state(&self) -> &ApiState {
        &self.state
    }

    /// Listens until Ctrl+C or SIGTERM, then drains in-flight requests.
    ///
    /// # Errors
    /// Binding the address or loading the TLS certificates fails.
    pub async fn run(self) -> Result<()> {
        let server_cfg = self.state.config.server.clone();
        let address = SocketAddr::new(server_cfg.address, server_cfg.port);
        let service = self.app().into_make_service();

        let handle = Handle::<SocketAddr>::new();
        tokio::spawn(drain_on_signal(handle.clone()));

        match &server_cfg.ssl {
            Some(ssl) => {
                let tls = RustlsConfig::from_pem_file(&ssl.cert, &ssl.key)
                    .await
                    .context("Failed to load TLS certificates")?;
                info!(%address, "Listening on https://{address}");
                axum_server::bind_rustls(address, tls)
                    .handle(handle)
                    .serve(service)
                    .await
                    .context("HTTPS listener failed")?;
            },
            None => {
                info!(%address, "Listening on http://{address}");
                axum_server::bind(address)
                    .handle(handle)
                    .serve(service)
                    .await
                    .context("HTTP listener failed")?;
            },
        }

        info!("Server stopped");
        Ok(())
    }
}

async fn drain_on_signal(handle: Handle<SocketAddr>) {
    match shutdown_signal().await {
        Ok(()) => {
            info!(grace_secs = SHUTDOWN_GRACE.as_secs(), "Shutting down");
            handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        },
        Err(err) => error!(error = %err, "Cannot listen for shutdown signals"),
    }
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => res,
        res = terminate => res,
    }
}
