//! Module `handler`
//!
//! Drives one client's control channel: greets, reads command lines, and
//! dispatches them until the client quits or the connection drops.

use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, error, info};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::auth::Account;
use crate::client::Session;
use crate::config::GatewayConfig;
use crate::events::Events;
use crate::protocol::{CommandStatus, handle_command, parse_command, responses};

const MAX_COMMAND_LENGTH: usize = 512;

/// Shared, immutable context every session runs against.
#[derive(Clone)]
pub struct SessionContext {
    pub config: Arc<GatewayConfig>,
    pub account: Arc<Account>,
    pub events: Events,
}

/// Handles one FTP control connection from greeting to close.
pub async fn handle_session(stream: TcpStream, addr: SocketAddr, ctx: SessionContext) {
    let local_ip = match stream.local_addr() {
        Ok(local) => local.ip(),
        Err(e) => {
            error!("Failed to read local address for {}: {}", addr, e);
            return;
        }
    };

    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let greeting = format!("220 {}\r\n", ctx.config.banner);
    if write_half.write_all(greeting.as_bytes()).await.is_err() {
        return;
    }
    let _ = write_half.flush().await;

    let mut session = Session::new(addr, local_ip);
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                info!("Connection closed by client {}", addr);
                break;
            }
            Ok(_) => {
                if line.len() > MAX_COMMAND_LENGTH {
                    let _ = write_half
                        .write_all(responses::COMMAND_TOO_LONG.as_bytes())
                        .await;
                    continue;
                }

                let command = parse_command(&line);
                debug!("Received from {}: {:?}", addr, command);

                let result = handle_command(&mut session, &command, &ctx, &mut write_half).await;

                match result.status {
                    CommandStatus::CloseConnection => {
                        if let Some(msg) = result.message {
                            let _ = write_half.write_all(msg.as_bytes()).await;
                        }
                        info!("Client {} requested to quit", addr);
                        break;
                    }
                    CommandStatus::Success | CommandStatus::Failure(_) => {
                        if let Some(msg) = result.message {
                            if write_half.write_all(msg.as_bytes()).await.is_err() {
                                break;
                            }
                        }
                    }
                }
            }
            Err(e) => {
                error!("Failed to read from {}: {}", addr, e);
                break;
            }
        }
    }
}
