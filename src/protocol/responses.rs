//! FTP response lines shared by multiple handlers.

pub const NOT_LOGGED_IN: &str = "530 Not logged in\r\n";
pub const LOGIN_SUCCESSFUL: &str = "230 Login successful\r\n";
pub const LOGIN_INCORRECT: &str = "530 Login incorrect\r\n";
pub const PASSWORD_REQUIRED: &str = "331 Password required\r\n";
pub const NEED_USER_FIRST: &str = "503 Login with USER first\r\n";
pub const PERMISSION_DENIED: &str = "550 Permission denied\r\n";
pub const NO_DATA_CHANNEL: &str = "425 Use PASV or PORT first\r\n";
pub const CANT_OPEN_DATA: &str = "425 Can't open data connection\r\n";
pub const OPENING_DATA: &str = "150 Opening data connection\r\n";
pub const TRANSFER_COMPLETE: &str = "226 Transfer complete\r\n";
pub const TRANSFER_ABORTED: &str = "426 Connection closed; transfer aborted\r\n";
pub const ACTION_COMPLETED: &str = "250 Requested file action okay, completed\r\n";
pub const SYNTAX_ERROR: &str = "501 Syntax error in parameters or arguments\r\n";
pub const UNKNOWN_COMMAND: &str = "500 Unknown command\r\n";
pub const COMMAND_TOO_LONG: &str = "500 Command too long\r\n";
pub const GOODBYE: &str = "221 Goodbye\r\n";
pub const TOO_MANY_CONNECTIONS: &str = "421 Too many connections. Try again later.\r\n";
pub const SYSTEM_TYPE: &str = "215 UNIX Type: L8\r\n";
