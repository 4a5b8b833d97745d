//! Module `file_ops`
//!
//! File upload and download over an open data stream. Uploads are staged in
//! a `.part` file and renamed into place only when the stream reaches a clean
//! EOF, so a crashed or aborted transfer never leaves a partial file behind.

use std::path::{Path, PathBuf};

use log::{error, info};
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::error::TransferError;

const BUFFER_SIZE: usize = 8192;

/// Builds the staging path for an upload target.
pub fn staging_path(final_path: &Path) -> PathBuf {
    let mut name = final_path.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

/// Receives a file from the data stream into `final_path`.
///
/// Data is written to the staging path and renamed on success. On any error
/// the staging file is removed before the error is surfaced; the caller is
/// responsible for reporting the incomplete transfer.
pub async fn receive_file(
    mut data_stream: TcpStream,
    final_path: &Path,
    temp_path: &Path,
) -> Result<u64, TransferError> {
    let mut temp_file = File::create(temp_path).await.map_err(|e| {
        error!("Failed to create staging file {}: {}", temp_path.display(), e);
        TransferError::TransferFailed(e)
    })?;

    let mut buffer = [0u8; BUFFER_SIZE];
    let mut total_bytes = 0u64;

    loop {
        let n = match data_stream.read(&mut buffer).await {
            Ok(0) => break, // clean EOF, upload complete
            Ok(n) => n,
            Err(e) => {
                drop(temp_file);
                let _ = fs::remove_file(temp_path).await;
                return Err(TransferError::TransferFailed(e));
            }
        };

        if let Err(e) = temp_file.write_all(&buffer[..n]).await {
            drop(temp_file);
            let _ = fs::remove_file(temp_path).await;
            return Err(TransferError::TransferFailed(e));
        }

        total_bytes += n as u64;
    }

    if let Err(e) = temp_file.flush().await {
        drop(temp_file);
        let _ = fs::remove_file(temp_path).await;
        return Err(TransferError::TransferFailed(e));
    }
    drop(temp_file);

    if let Err(e) = fs::rename(temp_path, final_path).await {
        let _ = fs::remove_file(temp_path).await;
        return Err(TransferError::TransferFailed(e));
    }

    info!(
        "Upload stored at {} ({} bytes)",
        final_path.display(),
        total_bytes
    );
    Ok(total_bytes)
}

/// Sends a file to the client over the data stream.
pub async fn send_file(mut data_stream: TcpStream, path: &Path) -> Result<u64, TransferError> {
    let mut file = File::open(path).await.map_err(TransferError::TransferFailed)?;

    let mut buffer = [0u8; BUFFER_SIZE];
    let mut total_bytes = 0u64;

    loop {
        let n = file.read(&mut buffer).await.map_err(TransferError::TransferFailed)?;
        if n == 0 {
            break;
        }
        data_stream
            .write_all(&buffer[..n])
            .await
            .map_err(TransferError::TransferFailed)?;
        total_bytes += n as u64;
    }

    data_stream.flush().await.map_err(TransferError::TransferFailed)?;
    info!("Sent {} ({} bytes)", path.display(), total_bytes);
    Ok(total_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_path_appends_part_suffix() {
        assert_eq!(
            staging_path(Path::new("/app/images/shot.jpg")),
            PathBuf::from("/app/images/shot.jpg.part")
        );
    }
}
