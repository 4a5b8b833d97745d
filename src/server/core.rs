//! Module `core`
//!
//! Startup bootstrap and the accept loop. Directories are created before the
//! listener binds; every admitted connection runs in its own task and the
//! loop itself never touches per-connection state.

use std::fs;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, error, info};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::auth::Account;
use crate::client::{SessionContext, handle_session};
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::events::Events;
use crate::protocol::responses;
use crate::server::ConnectionRegistry;

pub struct Server {
    listener: TcpListener,
    config: Arc<GatewayConfig>,
    account: Arc<Account>,
    events: Events,
    connections: Arc<Mutex<ConnectionRegistry>>,
}

impl Server {
    /// Bootstraps the gateway: ensures the save and log directories exist,
    /// registers the single account, and binds the control listener.
    ///
    /// Any failure here is fatal and happens before a client is served.
    pub async fn bind(config: GatewayConfig, events: Events) -> Result<Self, GatewayError> {
        for dir in [&config.save_dir, &config.log_dir] {
            fs::create_dir_all(dir).map_err(|source| GatewayError::Filesystem {
                path: dir.clone(),
                source,
            })?;
        }
        info!("Save directory: {}", config.save_dir.display());

        let account = Arc::new(Account::from_config(&config));

        let addr = config.control_socket();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| GatewayError::Bind { addr, source })?;

        let connections = ConnectionRegistry::new(
            config.max_total_connections,
            config.max_connections_per_source,
        );

        Ok(Self {
            listener,
            config: Arc::new(config),
            account,
            events,
            connections: Arc::new(Mutex::new(connections)),
        })
    }

    /// Actual bound address, for deployments (and tests) binding port 0.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop until process termination.
    pub async fn run(&self) {
        match self.local_addr() {
            Ok(addr) => info!(
                "FTP gateway listening on {}, saving to {} (max {} connections, {} per source)",
                addr,
                self.config.save_dir.display(),
                self.config.max_total_connections,
                self.config.max_connections_per_source
            ),
            Err(e) => error!("Listener address unavailable: {}", e),
        }

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let admitted = self.connections.lock().await.try_register(addr.ip());
                    if !admitted {
                        // Engine-level policy refusal, no lifecycle events
                        debug!("Refusing connection from {}: connection limit reached", addr);
                        tokio::spawn(async move {
                            let mut stream = stream;
                            let _ = stream
                                .write_all(responses::TOO_MANY_CONNECTIONS.as_bytes())
                                .await;
                            let _ = stream.shutdown().await;
                        });
                        continue;
                    }

                    self.events.connect(addr);

                    let ctx = SessionContext {
                        config: Arc::clone(&self.config),
                        account: Arc::clone(&self.account),
                        events: self.events.clone(),
                    };
                    let connections = Arc::clone(&self.connections);
                    let events = self.events.clone();

                    // One task per connection so the accept loop never blocks
                    tokio::spawn(async move {
                        handle_session(stream, addr, ctx).await;
                        connections.lock().await.release(addr.ip());
                        events.disconnect(addr);
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}
