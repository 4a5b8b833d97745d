//! Command handlers for the upload gateway.
//!
//! Dispatches parsed FTP commands against per-session state: login against
//! the single account, data channel negotiation, and transfers scoped to the
//! save directory. Transfer handlers write their preliminary `150` reply to
//! the control connection themselves; the final reply travels back through
//! `CommandResult`.

use log::{error, info, warn};
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedWriteHalf;

use crate::auth::{self, Permissions};
use crate::client::{Session, SessionContext};
use crate::error::{AuthError, StorageError};
use crate::protocol::responses;
use crate::protocol::{Command, CommandResult};
use crate::storage;
use crate::transfer::{self, DataChannel};

/// Dispatches a received FTP command to its corresponding handler.
pub async fn handle_command(
    session: &mut Session,
    command: &Command,
    ctx: &SessionContext,
    control: &mut OwnedWriteHalf,
) -> CommandResult {
    // Pre-login, only the login handshake and a few no-state commands exist
    if !session.is_logged_in()
        && !matches!(
            command,
            Command::USER(_) | Command::PASS(_) | Command::QUIT | Command::SYST | Command::NOOP
        )
    {
        return CommandResult::failure("Not logged in", responses::NOT_LOGGED_IN);
    }

    match command {
        Command::USER(username) => handle_cmd_user(session, username),
        Command::PASS(secret) => handle_cmd_pass(session, secret, ctx),
        Command::QUIT => handle_cmd_quit(session),
        Command::SYST => CommandResult::ok(responses::SYSTEM_TYPE),
        Command::TYPE(arg) => handle_cmd_type(arg),
        Command::NOOP => CommandResult::ok("200 NOOP ok\r\n"),
        Command::PWD => handle_cmd_pwd(session),
        Command::CWD(path) => handle_cmd_cwd(session, path, ctx),
        Command::CDUP => handle_cmd_cwd(session, "..", ctx),
        Command::PASV => handle_cmd_pasv(session).await,
        Command::PORT(arg) => handle_cmd_port(session, arg),
        Command::STOR(name) => handle_cmd_stor(session, name, ctx, control).await,
        Command::RETR(name) => handle_cmd_retr(session, name, ctx, control).await,
        Command::LIST => handle_cmd_list(session, ctx, control).await,
        Command::DELE(name) => handle_cmd_dele(session, name, ctx),
        Command::MKD(name) => handle_cmd_mkd(session, name, ctx),
        Command::RNFR(name) => handle_cmd_rnfr(session, name, ctx),
        Command::RNTO(name) => handle_cmd_rnto(session, name, ctx),
        Command::ABOR => CommandResult::ok("226 No transfer in progress\r\n"),
        Command::UNKNOWN => CommandResult::failure("Unknown command", responses::UNKNOWN_COMMAND),
    }
}

fn require_permission(ctx: &SessionContext, flag: Permissions) -> Option<CommandResult> {
    if ctx.account.permissions.allows(flag) {
        None
    } else {
        Some(CommandResult::failure(
            "Permission denied",
            responses::PERMISSION_DENIED,
        ))
    }
}

fn storage_failure(e: StorageError) -> CommandResult {
    let message = match &e {
        StorageError::FileNotFound(_) => "550 File not found\r\n".to_string(),
        StorageError::DirectoryNotFound(_) => "550 Directory not found\r\n".to_string(),
        StorageError::NotADirectory(_) => "550 Not a directory\r\n".to_string(),
        StorageError::InvalidPath(_) | StorageError::PathTraversal(_) => {
            "550 Invalid file path\r\n".to_string()
        }
        StorageError::IoError(_) => "550 Requested action not taken\r\n".to_string(),
    };
    CommandResult::failure(e.to_string(), message)
}

/// USER: record the attempted name; authentication happens at PASS.
fn handle_cmd_user(session: &mut Session, username: &str) -> CommandResult {
    session.set_logged_in(false);
    session.set_username(Some(username.to_string()));
    CommandResult::ok(responses::PASSWORD_REQUIRED)
}

/// PASS: validate the pair against the account and fire the login events.
fn handle_cmd_pass(session: &mut Session, secret: &str, ctx: &SessionContext) -> CommandResult {
    let Some(username) = session.username().map(String::from) else {
        return CommandResult::failure("Username not provided", responses::NEED_USER_FIRST);
    };

    match auth::authenticate(&ctx.account, &username, secret) {
        Ok(()) => {
            session.set_logged_in(true);
            ctx.events.login(&username, session.addr());
            CommandResult::ok(responses::LOGIN_SUCCESSFUL)
        }
        Err(e) => {
            session.set_logged_in(false);
            ctx.events.login_failed(&username, session.addr());
            let message = match e {
                AuthError::MalformedInput(_) => responses::SYNTAX_ERROR,
                _ => responses::LOGIN_INCORRECT,
            };
            CommandResult::failure(e.to_string(), message)
        }
    }
}

fn handle_cmd_quit(session: &mut Session) -> CommandResult {
    session.logout();
    CommandResult::close(responses::GOODBYE)
}

fn handle_cmd_type(arg: &str) -> CommandResult {
    match arg.to_ascii_uppercase().as_str() {
        "I" | "L8" => CommandResult::ok("200 Type set to I\r\n"),
        "A" => CommandResult::ok("200 Type set to A\r\n"),
        _ => CommandResult::failure(
            "Unsupported type",
            "504 Command not implemented for that parameter\r\n",
        ),
    }
}

fn handle_cmd_pwd(session: &Session) -> CommandResult {
    CommandResult::ok(format!(
        "257 \"{}\" is the current directory\r\n",
        session.cwd()
    ))
}

fn handle_cmd_cwd(session: &mut Session, path: &str, ctx: &SessionContext) -> CommandResult {
    match storage::resolve_directory(&ctx.account.home_dir, session.cwd(), path) {
        Ok((_, virtual_path)) => {
            session.set_cwd(virtual_path);
            CommandResult::ok(responses::ACTION_COMPLETED)
        }
        Err(e) => storage_failure(e),
    }
}

/// PASV: bind an ephemeral listener and announce it.
async fn handle_cmd_pasv(session: &mut Session) -> CommandResult {
    match transfer::setup_passive(session.local_ip()).await {
        Ok((channel, reply)) => {
            session.set_data_channel(Some(channel));
            CommandResult::ok(reply)
        }
        Err(e) => {
            error!("PASV setup failed for {}: {}", session.addr(), e);
            CommandResult::failure(e.to_string(), responses::CANT_OPEN_DATA)
        }
    }
}

/// PORT: record the client's data address for an outbound connection.
fn handle_cmd_port(session: &mut Session, arg: &str) -> CommandResult {
    match transfer::parse_port_argument(arg, session.addr().ip()) {
        Ok(addr) => {
            session.set_data_channel(Some(DataChannel::Active(addr)));
            CommandResult::ok("200 PORT command successful\r\n")
        }
        Err(e) => {
            warn!("Rejected PORT from {}: {}", session.addr(), e);
            CommandResult::failure(e.to_string(), responses::SYNTAX_ERROR)
        }
    }
}

/// STOR: receive an upload into the save directory.
async fn handle_cmd_stor(
    session: &mut Session,
    name: &str,
    ctx: &SessionContext,
    control: &mut OwnedWriteHalf,
) -> CommandResult {
    if let Some(denied) = require_permission(ctx, Permissions::UPLOAD) {
        return denied;
    }

    let (final_path, virtual_path) =
        match storage::resolve_entry(&ctx.account.home_dir, session.cwd(), name) {
            Ok(resolved) => resolved,
            Err(e) => return storage_failure(e),
        };

    let Some(channel) = session.take_data_channel() else {
        return CommandResult::failure("Data channel not initialized", responses::NO_DATA_CHANNEL);
    };

    if send_preliminary(control).await.is_err() {
        return CommandResult::failure("Control connection lost", responses::TRANSFER_ABORTED);
    }

    let data_stream = match transfer::open_data_stream(channel, session.addr().ip()).await {
        Ok(stream) => stream,
        Err(e) => {
            error!("Data connection failed for {}: {}", session.addr(), e);
            return CommandResult::failure(e.to_string(), responses::CANT_OPEN_DATA);
        }
    };

    let temp_path = transfer::file_ops::staging_path(&final_path);
    match transfer::receive_file(data_stream, &final_path, &temp_path).await {
        Ok(bytes) => {
            info!(
                "Client {} stored {} ({} bytes)",
                session.addr(),
                virtual_path,
                bytes
            );
            ctx.events.file_received(&final_path);
            CommandResult::ok(responses::TRANSFER_COMPLETE)
        }
        Err(e) => {
            warn!(
                "Upload of {} from {} aborted: {}",
                virtual_path,
                session.addr(),
                e
            );
            // receive_file has already removed the staging file
            ctx.events.incomplete_file_received(&temp_path);
            CommandResult::failure(e.to_string(), responses::TRANSFER_ABORTED)
        }
    }
}

/// RETR: send a stored file back to the client.
async fn handle_cmd_retr(
    session: &mut Session,
    name: &str,
    ctx: &SessionContext,
    control: &mut OwnedWriteHalf,
) -> CommandResult {
    if let Some(denied) = require_permission(ctx, Permissions::RETRIEVE) {
        return denied;
    }

    let (real_path, _) = match storage::resolve_entry(&ctx.account.home_dir, session.cwd(), name) {
        Ok(resolved) => resolved,
        Err(e) => return storage_failure(e),
    };

    if !real_path.is_file() {
        return CommandResult::failure("File not found", "550 File not found\r\n");
    }

    let Some(channel) = session.take_data_channel() else {
        return CommandResult::failure("Data channel not initialized", responses::NO_DATA_CHANNEL);
    };

    if send_preliminary(control).await.is_err() {
        return CommandResult::failure("Control connection lost", responses::TRANSFER_ABORTED);
    }

    let data_stream = match transfer::open_data_stream(channel, session.addr().ip()).await {
        Ok(stream) => stream,
        Err(e) => {
            error!("Data connection failed for {}: {}", session.addr(), e);
            return CommandResult::failure(e.to_string(), responses::CANT_OPEN_DATA);
        }
    };

    match transfer::send_file(data_stream, &real_path).await {
        Ok(_) => CommandResult::ok(responses::TRANSFER_COMPLETE),
        Err(e) => {
            warn!("Download failed for {}: {}", session.addr(), e);
            CommandResult::failure(e.to_string(), responses::TRANSFER_ABORTED)
        }
    }
}

/// LIST: send a plain name listing of the current directory.
async fn handle_cmd_list(
    session: &mut Session,
    ctx: &SessionContext,
    control: &mut OwnedWriteHalf,
) -> CommandResult {
    if let Some(denied) = require_permission(ctx, Permissions::LIST) {
        return denied;
    }

    let real_path = storage::virtual_to_real(&ctx.account.home_dir, session.cwd());
    let names = match storage::list_directory(&real_path, session.cwd() == "/") {
        Ok(names) => names,
        Err(e) => {
            error!(
                "Failed to list {} for {}: {}",
                session.cwd(),
                session.addr(),
                e
            );
            return CommandResult::failure(e.to_string(), "550 Failed to list directory\r\n");
        }
    };

    let Some(channel) = session.take_data_channel() else {
        return CommandResult::failure("Data channel not initialized", responses::NO_DATA_CHANNEL);
    };

    if send_preliminary(control).await.is_err() {
        return CommandResult::failure("Control connection lost", responses::TRANSFER_ABORTED);
    }

    let mut data_stream = match transfer::open_data_stream(channel, session.addr().ip()).await {
        Ok(stream) => stream,
        Err(e) => {
            error!("Data connection failed for {}: {}", session.addr(), e);
            return CommandResult::failure(e.to_string(), responses::CANT_OPEN_DATA);
        }
    };

    let listing = names.join("\r\n") + "\r\n";
    match data_stream.write_all(listing.as_bytes()).await {
        Ok(()) => {
            let _ = data_stream.shutdown().await;
            CommandResult::ok("226 Directory send OK\r\n")
        }
        Err(e) => {
            warn!("Failed to send listing to {}: {}", session.addr(), e);
            CommandResult::failure(e.to_string(), responses::TRANSFER_ABORTED)
        }
    }
}

fn handle_cmd_dele(session: &Session, name: &str, ctx: &SessionContext) -> CommandResult {
    if let Some(denied) = require_permission(ctx, Permissions::DELETE) {
        return denied;
    }

    match storage::resolve_entry(&ctx.account.home_dir, session.cwd(), name)
        .and_then(|(real, virt)| storage::remove_file(&real, &virt).map(|()| virt))
    {
        Ok(virtual_path) => {
            info!("Client {} deleted {}", session.addr(), virtual_path);
            CommandResult::ok("250 File deleted\r\n")
        }
        Err(e) => storage_failure(e),
    }
}

fn handle_cmd_mkd(session: &Session, name: &str, ctx: &SessionContext) -> CommandResult {
    if let Some(denied) = require_permission(ctx, Permissions::MAKE_DIR) {
        return denied;
    }

    match storage::resolve_entry(&ctx.account.home_dir, session.cwd(), name)
        .and_then(|(real, virt)| storage::make_directory(&real, &virt).map(|()| virt))
    {
        Ok(virtual_path) => CommandResult::ok(format!("257 \"{virtual_path}\" created\r\n")),
        Err(e) => storage_failure(e),
    }
}

fn handle_cmd_rnfr(session: &mut Session, name: &str, ctx: &SessionContext) -> CommandResult {
    if let Some(denied) = require_permission(ctx, Permissions::RENAME) {
        return denied;
    }

    match storage::resolve_entry(&ctx.account.home_dir, session.cwd(), name) {
        Ok((real, virt)) if real.exists() => {
            session.set_rename_from(Some((real, virt)));
            CommandResult::ok("350 Ready for RNTO\r\n")
        }
        Ok((_, virt)) => storage_failure(StorageError::FileNotFound(virt)),
        Err(e) => storage_failure(e),
    }
}

fn handle_cmd_rnto(session: &mut Session, name: &str, ctx: &SessionContext) -> CommandResult {
    if let Some(denied) = require_permission(ctx, Permissions::RENAME) {
        return denied;
    }

    let Some((from_real, from_virtual)) = session.take_rename_from() else {
        return CommandResult::failure("RNFR required first", "503 RNFR required first\r\n");
    };

    match storage::resolve_entry(&ctx.account.home_dir, session.cwd(), name)
        .and_then(|(to_real, to_virtual)| {
            storage::rename_entry(&from_real, &to_real, &from_virtual).map(|()| to_virtual)
        }) {
        Ok(to_virtual) => {
            info!(
                "Client {} renamed {} to {}",
                session.addr(),
                from_virtual,
                to_virtual
            );
            CommandResult::ok(responses::ACTION_COMPLETED)
        }
        Err(e) => storage_failure(e),
    }
}

async fn send_preliminary(control: &mut OwnedWriteHalf) -> std::io::Result<()> {
    control
        .write_all(responses::OPENING_DATA.as_bytes())
        .await?;
    control.flush().await
}
