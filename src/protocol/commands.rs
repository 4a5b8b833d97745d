//! Module `commands`
//!
//! Defines the FTP command grammar the gateway understands and the result
//! structure handlers return to the session loop.

/// Represents an FTP command parsed from client input.
///
/// Commands that require arguments store them as `String` variants.
#[derive(Debug, PartialEq)]
pub enum Command {
    USER(String), // Username for login
    PASS(String), // Secret for login
    QUIT,
    SYST,
    TYPE(String), // Transfer type (I/A)
    NOOP,
    PWD,
    CWD(String), // Change working directory
    CDUP,
    PASV,         // Enter passive mode
    PORT(String), // Active mode data address
    STOR(String), // Store/upload file
    RETR(String), // Retrieve/download file
    LIST,
    DELE(String), // Delete file
    MKD(String),  // Make directory
    RNFR(String), // Rename from
    RNTO(String), // Rename to
    ABOR,
    UNKNOWN, // Unknown or unsupported command
}

/// Outcome status of executing a command.
pub enum CommandStatus {
    Success,
    Failure(String),
    CloseConnection,
}

/// Full result of a command execution.
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: Option<String>,
}

impl CommandResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::Success,
            message: Some(message.into()),
        }
    }

    pub fn failure(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::Failure(reason.into()),
            message: Some(message.into()),
        }
    }

    pub fn close(message: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::CloseConnection,
            message: Some(message.into()),
        }
    }
}

/// Parses a raw command line received from a client into the `Command` enum.
///
/// Validates required arguments and returns `UNKNOWN` if a known command is
/// misused.
pub fn parse_command(raw: &str) -> Command {
    let trimmed = raw.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("").to_ascii_uppercase();
    let arg = parts.next().unwrap_or("").trim();

    match cmd.as_str() {
        "USER" if !arg.is_empty() => Command::USER(arg.to_string()),
        "PASS" if !arg.is_empty() => Command::PASS(arg.to_string()),
        "QUIT" => Command::QUIT,
        "SYST" => Command::SYST,
        "TYPE" if !arg.is_empty() => Command::TYPE(arg.to_string()),
        "NOOP" => Command::NOOP,
        "PWD" => Command::PWD,
        "CWD" if !arg.is_empty() => Command::CWD(arg.to_string()),
        "CDUP" => Command::CDUP,
        "PASV" => Command::PASV,
        "PORT" if !arg.is_empty() => Command::PORT(arg.to_string()),
        "STOR" if !arg.is_empty() => Command::STOR(arg.to_string()),
        "RETR" if !arg.is_empty() => Command::RETR(arg.to_string()),
        "LIST" => Command::LIST,
        "DELE" if !arg.is_empty() => Command::DELE(arg.to_string()),
        "MKD" if !arg.is_empty() => Command::MKD(arg.to_string()),
        "RNFR" if !arg.is_empty() => Command::RNFR(arg.to_string()),
        "RNTO" if !arg.is_empty() => Command::RNTO(arg.to_string()),
        "ABOR" => Command::ABOR,
        _ => Command::UNKNOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_case_insensitive() {
        assert_eq!(parse_command("user camera\r\n"), Command::USER("camera".into()));
        assert_eq!(parse_command("StOr shot.jpg\r\n"), Command::STOR("shot.jpg".into()));
        assert_eq!(parse_command("QUIT\r\n"), Command::QUIT);
    }

    #[test]
    fn arguments_keep_their_case() {
        assert_eq!(parse_command("PASS Secret123\r\n"), Command::PASS("Secret123".into()));
    }

    #[test]
    fn missing_required_argument_is_unknown() {
        assert_eq!(parse_command("USER\r\n"), Command::UNKNOWN);
        assert_eq!(parse_command("STOR   \r\n"), Command::UNKNOWN);
        assert_eq!(parse_command("RNFR\r\n"), Command::UNKNOWN);
    }

    #[test]
    fn unsupported_commands_are_unknown() {
        assert_eq!(parse_command("FEAT\r\n"), Command::UNKNOWN);
        assert_eq!(parse_command("\r\n"), Command::UNKNOWN);
    }

    #[test]
    fn port_argument_is_kept_verbatim() {
        assert_eq!(
            parse_command("PORT 192,168,1,20,7,208\r\n"),
            Command::PORT("192,168,1,20,7,208".into())
        );
    }
}
