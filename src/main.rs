//! Camera FTP Upload Gateway - Entry Point
//!
//! A single-user FTP endpoint that stores camera uploads in a fixed
//! directory and logs every connection lifecycle event.

use std::process;
use std::sync::Arc;

use log::{error, info};

use cam_ftp_gateway::{Events, GatewayConfig, LogHandler, Server, logging};

#[tokio::main]
async fn main() {
    // Credentials come from FTP_USER/FTP_PASS; everything else is fixed.
    let config = match GatewayConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            process::exit(1);
        }
    };

    // Log to stderr and <log_dir>/ftp_server.log (RUST_LOG overrides the level)
    if let Err(e) = logging::init(&config.log_dir) {
        eprintln!("Failed to initialize logging: {e}");
        process::exit(1);
    }

    info!("Launching camera FTP gateway...");

    let events = Events::new(Arc::new(LogHandler));
    let server = match Server::bind(config, events).await {
        Ok(server) => server,
        Err(e) => {
            error!("Startup failed: {e}");
            process::exit(1);
        }
    };

    server.run().await;
}
