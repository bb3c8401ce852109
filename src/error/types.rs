//! Error types
//!
//! Defines domain-specific error types for each layer of the transfer service.

use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Packet codec errors
#[derive(Debug)]
pub enum ProtocolError {
    PayloadTooLarge(usize),
    TagTooLong(String),
    InvalidLength(u16),
    ConnectionClosed,
    TimedOut(Duration),
    Io(io::Error),
}

impl ProtocolError {
    /// True when the failure came from the transport itself rather than
    /// from what the peer sent.
    pub fn is_transport(&self) -> bool {
        matches!(self, ProtocolError::Io(_))
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::PayloadTooLarge(len) => {
                write!(f, "Payload of {} bytes exceeds the 512 byte limit", len)
            }
            ProtocolError::TagTooLong(tag) => write!(f, "Tag too long: {}", tag),
            ProtocolError::InvalidLength(len) => write!(f, "Invalid packet length: {}", len),
            ProtocolError::ConnectionClosed => write!(f, "Connection closed by peer"),
            ProtocolError::TimedOut(limit) => {
                write!(f, "No progress within {} ms", limit.as_millis())
            }
            ProtocolError::Io(e) => write!(f, "Transport error: {}", e),
        }
    }
}

impl std::error::Error for ProtocolError {}

impl From<io::Error> for ProtocolError {
    fn from(error: io::Error) -> Self {
        if error.kind() == io::ErrorKind::UnexpectedEof {
            ProtocolError::ConnectionClosed
        } else {
            ProtocolError::Io(error)
        }
    }
}

/// Storage module errors
#[derive(Debug)]
pub enum StorageError {
    DirectoryUnreadable(PathBuf, io::Error),
    CannotOpen(String, io::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::DirectoryUnreadable(p, e) => {
                write!(f, "Cannot read directory {}: {}", p.display(), e)
            }
            StorageError::CannotOpen(name, e) => write!(f, "Cannot open {}: {}", name, e),
        }
    }
}

impl std::error::Error for StorageError {}

/// Data channel setup errors
#[derive(Debug)]
pub enum TransferError {
    ConnectFailed {
        addr: SocketAddr,
        attempts: u32,
        source: io::Error,
    },
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::ConnectFailed {
                addr,
                attempts,
                source,
            } => write!(
                f,
                "Failed to connect to {} after {} attempts: {}",
                addr, attempts, source
            ),
        }
    }
}

impl std::error::Error for TransferError {}

/// General server error that encompasses all error types
#[derive(Debug)]
pub enum ServerError {
    Bind(String, io::Error),
    Accept(io::Error),
    Config(config::ConfigError),
    Protocol(ProtocolError),
    Storage(StorageError),
    Transfer(TransferError),
}

impl ServerError {
    /// Whether this error must take the whole process down.
    ///
    /// Listener failures and an unreadable served directory always are.
    /// Transport failures inside a session (including an exhausted data
    /// connect) are fatal only while `abort_on_transport_error` is set.
    pub fn is_fatal(&self, abort_on_transport_error: bool) -> bool {
        match self {
            ServerError::Bind(..) | ServerError::Accept(_) | ServerError::Config(_) => true,
            ServerError::Storage(StorageError::DirectoryUnreadable(..)) => true,
            ServerError::Storage(_) => false,
            ServerError::Protocol(e) => e.is_transport() && abort_on_transport_error,
            ServerError::Transfer(_) => abort_on_transport_error,
        }
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Bind(addr, e) => write!(f, "Failed to bind to {}: {}", addr, e),
            ServerError::Accept(e) => write!(f, "Failed to accept connection: {}", e),
            ServerError::Config(e) => write!(f, "Configuration error: {}", e),
            ServerError::Protocol(e) => write!(f, "Protocol error: {}", e),
            ServerError::Storage(e) => write!(f, "Storage error: {}", e),
            ServerError::Transfer(e) => write!(f, "Transfer error: {}", e),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<ProtocolError> for ServerError {
    fn from(error: ProtocolError) -> Self {
        ServerError::Protocol(error)
    }
}

impl From<StorageError> for ServerError {
    fn from(error: StorageError) -> Self {
        ServerError::Storage(error)
    }
}

impl From<TransferError> for ServerError {
    fn from(error: TransferError) -> Self {
        ServerError::Transfer(error)
    }
}

impl From<config::ConfigError> for ServerError {
    fn from(error: config::ConfigError) -> Self {
        ServerError::Config(error)
    }
}

/// Client-side errors
#[derive(Debug)]
pub enum ClientError {
    Usage(String),
    Resolve(String, io::Error),
    Connect(String, io::Error),
    DataListener(u16, io::Error),
    UnexpectedPacket(String),
    Protocol(ProtocolError),
    Io(io::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Usage(msg) => write!(f, "{}", msg),
            ClientError::Resolve(host, e) => write!(f, "Cannot resolve {}: {}", host, e),
            ClientError::Connect(addr, e) => write!(f, "Cannot connect to {}: {}", addr, e),
            ClientError::DataListener(port, e) => {
                write!(f, "Cannot listen on data port {}: {}", port, e)
            }
            ClientError::UnexpectedPacket(tag) => write!(f, "Unexpected packet: {}", tag),
            ClientError::Protocol(e) => write!(f, "Protocol error: {}", e),
            ClientError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<ProtocolError> for ClientError {
    fn from(error: ProtocolError) -> Self {
        ClientError::Protocol(error)
    }
}

impl From<io::Error> for ClientError {
    fn from(error: io::Error) -> Self {
        ClientError::Io(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listener_failures_are_always_fatal() {
        let err = ServerError::Accept(io::Error::other("boom"));
        assert!(err.is_fatal(true));
        assert!(err.is_fatal(false));
    }

    #[test]
    fn test_transport_errors_follow_policy() {
        let err = ServerError::Protocol(ProtocolError::Io(io::Error::from(
            io::ErrorKind::ConnectionReset,
        )));
        assert!(err.is_fatal(true));
        assert!(!err.is_fatal(false));
    }

    #[test]
    fn test_connect_exhaustion_follows_policy() {
        let err = ServerError::Transfer(TransferError::ConnectFailed {
            addr: "127.0.0.1:30022".parse().unwrap(),
            attempts: 10,
            source: io::Error::from(io::ErrorKind::ConnectionRefused),
        });
        assert!(err.is_fatal(true));
        assert!(!err.is_fatal(false));
    }

    #[test]
    fn test_peer_misbehaviour_is_session_level() {
        let closed = ServerError::Protocol(ProtocolError::ConnectionClosed);
        assert!(!closed.is_fatal(true));

        let bad_length = ServerError::Protocol(ProtocolError::InvalidLength(3));
        assert!(!bad_length.is_fatal(true));

        let timed_out = ServerError::Protocol(ProtocolError::TimedOut(Duration::from_secs(1)));
        assert!(!timed_out.is_fatal(true));

        let unopenable = ServerError::Storage(StorageError::CannotOpen(
            "x".into(),
            io::Error::from(io::ErrorKind::PermissionDenied),
        ));
        assert!(!unopenable.is_fatal(true));
    }

    #[test]
    fn test_config_errors_are_fatal() {
        let err = ServerError::from(config::ConfigError::Message("bad".into()));
        assert!(matches!(err, ServerError::Config(_)));
        assert!(err.is_fatal(false));
    }

    #[test]
    fn test_unexpected_eof_maps_to_connection_closed() {
        let err = ProtocolError::from(io::Error::from(io::ErrorKind::UnexpectedEof));
        assert!(matches!(err, ProtocolError::ConnectionClosed));
    }
}
