//! Module `account`
//!
//! The single credential/permission/home-directory tuple the gateway
//! recognizes. Built once at startup from configuration, immutable for the
//! process lifetime.

use std::path::PathBuf;

use crate::config::GatewayConfig;

/// Permission flags scoped to the account's home directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions(u8);

impl Permissions {
    pub const LIST: Permissions = Permissions(0b0000_0001);
    pub const RETRIEVE: Permissions = Permissions(0b0000_0010);
    pub const UPLOAD: Permissions = Permissions(0b0000_0100);
    pub const RENAME: Permissions = Permissions(0b0000_1000);
    pub const DELETE: Permissions = Permissions(0b0001_0000);
    pub const MAKE_DIR: Permissions = Permissions(0b0010_0000);
    pub const WRITE_METADATA: Permissions = Permissions(0b0100_0000);
    pub const ABORT: Permissions = Permissions(0b1000_0000);

    /// Full read/write within the home directory, no administrative scope.
    pub fn full() -> Permissions {
        Permissions(0xFF)
    }

    pub fn empty() -> Permissions {
        Permissions(0)
    }

    pub fn with(self, other: Permissions) -> Permissions {
        Permissions(self.0 | other.0)
    }

    pub fn allows(&self, flag: Permissions) -> bool {
        self.0 & flag.0 == flag.0
    }
}

/// The single authorized account.
#[derive(Debug, Clone)]
pub struct Account {
    pub username: String,
    pub secret: String,
    pub home_dir: PathBuf,
    pub permissions: Permissions,
}

impl Account {
    /// Build the account from configuration with the broad default grant.
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            username: config.user.clone(),
            secret: config.pass.clone(),
            home_dir: config.save_dir.clone(),
            permissions: Permissions::full(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_grant_allows_every_flag() {
        let perms = Permissions::full();
        assert!(perms.allows(Permissions::LIST));
        assert!(perms.allows(Permissions::UPLOAD));
        assert!(perms.allows(Permissions::DELETE));
        assert!(perms.allows(Permissions::RENAME));
        assert!(perms.allows(Permissions::MAKE_DIR));
    }

    #[test]
    fn restricted_grant_denies_missing_flags() {
        let perms = Permissions::empty()
            .with(Permissions::UPLOAD)
            .with(Permissions::LIST);
        assert!(perms.allows(Permissions::UPLOAD));
        assert!(perms.allows(Permissions::LIST));
        assert!(!perms.allows(Permissions::DELETE));
        assert!(!perms.allows(Permissions::RETRIEVE));
    }
}
