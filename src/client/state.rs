//! Module `state`
//!
//! Per-connection session state: authentication progress, current virtual
//! directory, the negotiated data channel, and any pending rename. Owned
//! exclusively by the connection's task.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::transfer::DataChannel;

pub struct Session {
    addr: SocketAddr,
    local_ip: IpAddr,
    username: Option<String>,
    logged_in: bool,
    cwd: String,
    data_channel: Option<DataChannel>,
    rename_from: Option<(PathBuf, String)>,
}

impl Session {
    pub fn new(addr: SocketAddr, local_ip: IpAddr) -> Self {
        Self {
            addr,
            local_ip,
            username: None,
            logged_in: false,
            cwd: "/".to_string(),
            data_channel: None,
            rename_from: None,
        }
    }

    /// Clears all authentication and transfer state.
    pub fn logout(&mut self) {
        self.username = None;
        self.logged_in = false;
        self.cwd = "/".to_string();
        self.data_channel = None;
        self.rename_from = None;
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Local IP of the control connection, used for PASV replies.
    pub fn local_ip(&self) -> IpAddr {
        self.local_ip
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn set_logged_in(&mut self, logged_in: bool) {
        self.logged_in = logged_in;
    }

    pub fn username(&self) -> Option<&String> {
        self.username.as_ref()
    }

    pub fn set_username(&mut self, username: Option<String>) {
        self.username = username;
    }

    /// Current virtual directory, always rooted at "/".
    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    pub fn set_cwd(&mut self, cwd: String) {
        self.cwd = cwd;
    }

    pub fn set_data_channel(&mut self, channel: Option<DataChannel>) {
        self.data_channel = channel;
    }

    /// Consumes the negotiated data channel; each PASV/PORT serves one
    /// transfer.
    pub fn take_data_channel(&mut self) -> Option<DataChannel> {
        self.data_channel.take()
    }

    pub fn set_rename_from(&mut self, pending: Option<(PathBuf, String)>) {
        self.rename_from = pending;
    }

    pub fn take_rename_from(&mut self) -> Option<(PathBuf, String)> {
        self.rename_from.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(
            "192.168.1.20:51000".parse().unwrap(),
            "192.168.1.1".parse().unwrap(),
        )
    }

    #[test]
    fn new_session_is_unauthenticated_at_root() {
        let session = session();
        assert!(!session.is_logged_in());
        assert_eq!(session.cwd(), "/");
        assert!(session.username().is_none());
    }

    #[test]
    fn logout_clears_state() {
        let mut session = session();
        session.set_username(Some("camera".to_string()));
        session.set_logged_in(true);
        session.set_cwd("/sub".to_string());
        session.set_rename_from(Some((PathBuf::from("/tmp/a"), "/a".to_string())));

        session.logout();

        assert!(!session.is_logged_in());
        assert!(session.username().is_none());
        assert_eq!(session.cwd(), "/");
        assert!(session.take_rename_from().is_none());
    }

    #[test]
    fn rename_state_is_consumed_once() {
        let mut session = session();
        session.set_rename_from(Some((PathBuf::from("/tmp/a"), "/a".to_string())));
        assert!(session.take_rename_from().is_some());
        assert!(session.take_rename_from().is_none());
    }
}
