//! Lifecycle event contract
//!
//! The gateway observes connections through six extension points rather than
//! reaching into engine state. Handlers are pure side-effecting observers:
//! they must not block on network or heavy I/O, and a panic inside one is
//! contained to the event that raised it.

use std::net::SocketAddr;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use std::sync::Arc;

use log::{error, info, warn};

/// One method per observable lifecycle moment.
pub trait EventHandler: Send + Sync {
    fn on_connect(&self, remote: SocketAddr);
    fn on_disconnect(&self, remote: SocketAddr);
    fn on_login(&self, username: &str, remote: SocketAddr);
    fn on_login_failed(&self, username: &str, remote: SocketAddr);
    fn on_file_received(&self, path: &Path);
    fn on_incomplete_file_received(&self, path: &Path);
}

/// Default handler: one log line per event.
pub struct LogHandler;

impl EventHandler for LogHandler {
    fn on_connect(&self, remote: SocketAddr) {
        info!("New connection from {}:{}", remote.ip(), remote.port());
    }

    fn on_disconnect(&self, remote: SocketAddr) {
        info!("Disconnected: {}", remote.ip());
    }

    fn on_login(&self, username: &str, remote: SocketAddr) {
        info!("User logged in: {} from {}", username, remote.ip());
    }

    fn on_login_failed(&self, username: &str, remote: SocketAddr) {
        warn!(
            "Failed login attempt: username={} ip={}",
            username,
            remote.ip()
        );
    }

    fn on_file_received(&self, path: &Path) {
        info!("File received and saved: {}", path.display());
    }

    fn on_incomplete_file_received(&self, path: &Path) {
        warn!("Incomplete file received (removed): {}", path.display());
    }
}

/// Cloneable dispatcher shared by all connection tasks.
///
/// Every dispatch runs under `catch_unwind` so a faulty handler cannot take
/// down the accept loop or an unrelated connection.
#[derive(Clone)]
pub struct Events {
    handler: Arc<dyn EventHandler>,
}

impl Events {
    pub fn new(handler: Arc<dyn EventHandler>) -> Self {
        Self { handler }
    }

    fn dispatch(&self, event: &str, f: impl FnOnce()) {
        if catch_unwind(AssertUnwindSafe(f)).is_err() {
            error!("Event handler panicked during {event}");
        }
    }

    pub fn connect(&self, remote: SocketAddr) {
        self.dispatch("connect", || self.handler.on_connect(remote));
    }

    pub fn disconnect(&self, remote: SocketAddr) {
        self.dispatch("disconnect", || self.handler.on_disconnect(remote));
    }

    pub fn login(&self, username: &str, remote: SocketAddr) {
        self.dispatch("login", || self.handler.on_login(username, remote));
    }

    pub fn login_failed(&self, username: &str, remote: SocketAddr) {
        self.dispatch("login_failed", || {
            self.handler.on_login_failed(username, remote)
        });
    }

    pub fn file_received(&self, path: &Path) {
        self.dispatch("file_received", || self.handler.on_file_received(path));
    }

    pub fn incomplete_file_received(&self, path: &Path) {
        self.dispatch("incomplete_file_received", || {
            self.handler.on_incomplete_file_received(path)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct PanickingHandler {
        calls: AtomicUsize,
    }

    impl EventHandler for PanickingHandler {
        fn on_connect(&self, _remote: SocketAddr) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            panic!("handler bug");
        }
        fn on_disconnect(&self, _remote: SocketAddr) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
        fn on_login(&self, _username: &str, _remote: SocketAddr) {}
        fn on_login_failed(&self, _username: &str, _remote: SocketAddr) {}
        fn on_file_received(&self, _path: &Path) {}
        fn on_incomplete_file_received(&self, _path: &Path) {}
    }

    #[test]
    fn handler_panic_is_contained() {
        let handler = Arc::new(PanickingHandler {
            calls: AtomicUsize::new(0),
        });
        let events = Events::new(handler.clone());
        let remote: SocketAddr = "127.0.0.1:40000".parse().unwrap();

        // The panic in on_connect must not propagate, and later events
        // must still be delivered.
        events.connect(remote);
        events.disconnect(remote);

        assert_eq!(handler.calls.load(Ordering::SeqCst), 2);
    }
}
