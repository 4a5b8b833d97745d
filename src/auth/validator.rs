//! Authentication validator
//!
//! Validates a username/secret pair against the gateway's single account.
//! Any mismatch is reported with the attempted username only; the attempted
//! secret is never placed in an error or a log line.

use crate::auth::Account;
use crate::error::AuthError;

const MAX_CREDENTIAL_LENGTH: usize = 128;

/// Basic input sanitation for usernames and secrets.
fn is_valid_input(input: &str, max_length: usize) -> bool {
    !input.trim().is_empty() && input.len() <= max_length && !input.contains(['\r', '\n', '\0'])
}

/// Validates the credential pair against the account.
pub fn authenticate(account: &Account, username: &str, secret: &str) -> Result<(), AuthError> {
    if !is_valid_input(username, MAX_CREDENTIAL_LENGTH) {
        return Err(AuthError::MalformedInput("Invalid username format".into()));
    }

    if !is_valid_input(secret, MAX_CREDENTIAL_LENGTH) {
        return Err(AuthError::MalformedInput("Invalid password format".into()));
    }

    if username == account.username && secret == account.secret {
        Ok(())
    } else {
        Err(AuthError::LoginFailed(username.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Permissions;
    use std::path::PathBuf;

    fn account() -> Account {
        Account {
            username: "camera".to_string(),
            secret: "hunter2".to_string(),
            home_dir: PathBuf::from("/tmp/images"),
            permissions: Permissions::full(),
        }
    }

    #[test]
    fn exact_credentials_authenticate() {
        assert!(authenticate(&account(), "camera", "hunter2").is_ok());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let err = authenticate(&account(), "camera", "wrong").unwrap_err();
        match err {
            AuthError::LoginFailed(user) => assert_eq!(user, "camera"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn wrong_username_is_rejected() {
        let err = authenticate(&account(), "intruder", "hunter2").unwrap_err();
        match err {
            AuthError::LoginFailed(user) => assert_eq!(user, "intruder"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejection_message_never_contains_secret() {
        let err = authenticate(&account(), "camera", "sekrit-attempt").unwrap_err();
        assert!(!err.to_string().contains("sekrit-attempt"));
    }

    #[test]
    fn control_characters_are_malformed() {
        assert!(matches!(
            authenticate(&account(), "cam\r\nera", "hunter2"),
            Err(AuthError::MalformedInput(_))
        ));
        assert!(matches!(
            authenticate(&account(), "camera", ""),
            Err(AuthError::MalformedInput(_))
        ));
    }
}
