pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod protocol;
pub mod server;
pub mod storage;
pub mod transfer;

pub use config::GatewayConfig;
pub use events::{EventHandler, Events, LogHandler};
pub use server::Server;
