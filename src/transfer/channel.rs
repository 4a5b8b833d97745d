//! Module `channel`
//!
//! Per-session data channel negotiation. A session holds at most one
//! negotiated channel: a bound listener after PASV, or the client's data
//! address after PORT. The channel is consumed by the next transfer command.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use log::{info, warn};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

use crate::error::TransferError;

/// How long a transfer command waits for the data connection.
const DATA_CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// The data channel negotiated for the next transfer.
pub enum DataChannel {
    /// PASV: the server listens and the client connects.
    Passive(TcpListener),
    /// PORT: the server connects out to the client's address.
    Active(SocketAddr),
}

/// Binds a passive-mode listener on an ephemeral port and formats the
/// `227` reply announcing it.
pub async fn setup_passive(local_ip: IpAddr) -> Result<(DataChannel, String), TransferError> {
    let listener = TcpListener::bind((local_ip, 0))
        .await
        .map_err(TransferError::PortBindingFailed)?;
    let addr = listener.local_addr().map_err(TransferError::PortBindingFailed)?;

    let reply = format_pasv_reply(addr)?;
    info!("Passive data listener bound to {}", addr);
    Ok((DataChannel::Passive(listener), reply))
}

/// Formats `227 Entering Passive Mode (h1,h2,h3,h4,p1,p2)`.
pub fn format_pasv_reply(addr: SocketAddr) -> Result<String, TransferError> {
    let IpAddr::V4(ip) = addr.ip() else {
        return Err(TransferError::UnsupportedAddressFamily);
    };
    let [h1, h2, h3, h4] = ip.octets();
    let port = addr.port();
    Ok(format!(
        "227 Entering Passive Mode ({},{},{},{},{},{})\r\n",
        h1,
        h2,
        h3,
        h4,
        port >> 8,
        port & 0xFF
    ))
}

/// Parses the `h1,h2,h3,h4,p1,p2` argument of a PORT command.
///
/// The address must belong to the control connection's source IP and use a
/// non-privileged port.
pub fn parse_port_argument(arg: &str, client_ip: IpAddr) -> Result<SocketAddr, TransferError> {
    let parts: Vec<&str> = arg.split(',').map(str::trim).collect();
    if parts.len() != 6 {
        return Err(TransferError::InvalidPortCommand(
            "expected 6 comma-separated values".into(),
        ));
    }

    let octets: Vec<u8> = parts
        .iter()
        .map(|p| p.parse::<u8>())
        .collect::<Result<_, _>>()
        .map_err(|_| TransferError::InvalidPortCommand("non-numeric value".into()))?;

    let ip = IpAddr::from([octets[0], octets[1], octets[2], octets[3]]);
    let port = (octets[4] as u16) << 8 | octets[5] as u16;

    if ip != client_ip {
        return Err(TransferError::IpMismatch {
            expected: client_ip.to_string(),
            provided: ip.to_string(),
        });
    }

    if port < 1024 {
        return Err(TransferError::InvalidPortRange(port));
    }

    Ok(SocketAddr::new(ip, port))
}

/// Opens the actual data stream for a transfer, consuming the channel.
///
/// Passive mode accepts one connection and checks that the peer is the
/// control connection's source; active mode connects out.
pub async fn open_data_stream(
    channel: DataChannel,
    client_ip: IpAddr,
) -> Result<TcpStream, TransferError> {
    match channel {
        DataChannel::Passive(listener) => {
            let (stream, peer) = timeout(DATA_CONNECTION_TIMEOUT, listener.accept())
                .await
                .map_err(|_| TransferError::AcceptTimeout)?
                .map_err(TransferError::TransferFailed)?;

            if peer.ip() != client_ip {
                warn!(
                    "Rejected data connection from {} (control connection is {})",
                    peer, client_ip
                );
                return Err(TransferError::IpMismatch {
                    expected: client_ip.to_string(),
                    provided: peer.ip().to_string(),
                });
            }

            Ok(stream)
        }
        DataChannel::Active(addr) => {
            let stream = timeout(DATA_CONNECTION_TIMEOUT, TcpStream::connect(addr))
                .await
                .map_err(|_| TransferError::AcceptTimeout)?
                .map_err(TransferError::TransferFailed)?;
            Ok(stream)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_ip() -> IpAddr {
        "192.168.1.20".parse().unwrap()
    }

    #[test]
    fn port_argument_parses_address_and_port() {
        let addr = parse_port_argument("192,168,1,20,7,208", client_ip()).unwrap();
        assert_eq!(addr, "192.168.1.20:2000".parse().unwrap());
    }

    #[test]
    fn port_argument_rejects_foreign_ip() {
        assert!(matches!(
            parse_port_argument("10,0,0,9,7,208", client_ip()),
            Err(TransferError::IpMismatch { .. })
        ));
    }

    #[test]
    fn port_argument_rejects_privileged_ports() {
        // 0,80 => port 80
        assert!(matches!(
            parse_port_argument("192,168,1,20,0,80", client_ip()),
            Err(TransferError::InvalidPortRange(80))
        ));
    }

    #[test]
    fn port_argument_rejects_malformed_input() {
        assert!(parse_port_argument("1,2,3", client_ip()).is_err());
        assert!(parse_port_argument("a,b,c,d,e,f", client_ip()).is_err());
        assert!(parse_port_argument("300,0,0,1,7,208", client_ip()).is_err());
    }

    #[test]
    fn pasv_reply_encodes_port_in_two_octets() {
        let reply = format_pasv_reply("127.0.0.1:2122".parse().unwrap()).unwrap();
        assert_eq!(reply, "227 Entering Passive Mode (127,0,0,1,8,74)\r\n");
    }

    #[test]
    fn pasv_reply_requires_ipv4() {
        assert!(matches!(
            format_pasv_reply("[::1]:2122".parse().unwrap()),
            Err(TransferError::UnsupportedAddressFamily)
        ));
    }
}
