//! Control connection negotiation
//!
//! The first two packets of a session announce the data port and the
//! command. An `OKAY` reply only says the command is well formed; whether
//! a GET can be served is reported later on this same connection.

use log::{debug, info, warn};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::ProtocolError;
use crate::protocol::responses::{INVALID_COMMAND, INVALID_DATA_PORT};
use crate::protocol::{Command, PacketStream, Tag, parse_data_port};
use crate::session::results::{ControlOutcome, Negotiated, Rejection};

/// Reads the data port and command, then accepts or rejects them.
///
/// A first packet that is not a valid `DPORT` is refused immediately,
/// without reading a command.
pub async fn negotiate<S>(control: &mut PacketStream<S>) -> Result<ControlOutcome, ProtocolError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    debug!("Receiving data port");
    let announcement = control.recv().await?;
    let Some(data_port) = parse_data_port(&announcement) else {
        warn!(
            "Bad data port announcement: {} {:?}",
            announcement.tag,
            announcement.payload_str()
        );
        control
            .send(Tag::Error, INVALID_DATA_PORT.as_bytes())
            .await?;
        return Ok(ControlOutcome::Rejected(Rejection::InvalidDataPort(
            announcement.tag,
        )));
    };

    debug!("Receiving command");
    let request = control.recv().await?;
    match Command::from_packet(&request) {
        Some(command) => {
            info!("Accepted {} (data port {})", command.tag(), data_port);
            control.send(Tag::Okay, b"").await?;
            Ok(ControlOutcome::Accepted(Negotiated { command, data_port }))
        }
        None => {
            warn!("Rejected command {}", request.tag);
            control.send(Tag::Error, INVALID_COMMAND.as_bytes()).await?;
            Ok(ControlOutcome::Rejected(Rejection::InvalidCommand(
                request.tag,
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Packet;
    use tokio::io::DuplexStream;

    fn pair() -> (PacketStream<DuplexStream>, PacketStream<DuplexStream>) {
        let (server, client) = tokio::io::duplex(4096);
        (PacketStream::new(server), PacketStream::new(client))
    }

    #[tokio::test]
    async fn test_accepts_list() {
        let (mut server, mut client) = pair();
        client.send(Tag::Dport, b"30022").await.unwrap();
        client.send(Tag::List, b"").await.unwrap();

        let outcome = negotiate(&mut server).await.unwrap();
        assert_eq!(
            outcome,
            ControlOutcome::Accepted(Negotiated {
                command: Command::List,
                data_port: 30022,
            })
        );
        assert_eq!(client.recv().await.unwrap(), Packet::new(Tag::Okay, ""));
    }

    #[tokio::test]
    async fn test_accepts_get_with_filename() {
        let (mut server, mut client) = pair();
        client.send(Tag::Dport, b"40000").await.unwrap();
        client.send(Tag::Get, b"notes.txt").await.unwrap();

        let outcome = negotiate(&mut server).await.unwrap();
        assert_eq!(
            outcome,
            ControlOutcome::Accepted(Negotiated {
                command: Command::Get("notes.txt".to_string()),
                data_port: 40000,
            })
        );
        assert_eq!(client.recv().await.unwrap().tag, Tag::Okay);
    }

    #[tokio::test]
    async fn test_rejects_unknown_command() {
        let (mut server, mut client) = pair();
        client.send(Tag::Dport, b"30022").await.unwrap();
        client
            .send(Tag::Other("DELETE".to_string()), b"a.txt")
            .await
            .unwrap();

        let outcome = negotiate(&mut server).await.unwrap();
        assert_eq!(
            outcome,
            ControlOutcome::Rejected(Rejection::InvalidCommand(Tag::Other(
                "DELETE".to_string()
            )))
        );

        let reply = client.recv().await.unwrap();
        assert_eq!(reply, Packet::new(Tag::Error, INVALID_COMMAND));

        // Nothing else follows the rejection
        drop(server);
        assert!(matches!(
            client.recv().await,
            Err(ProtocolError::ConnectionClosed)
        ));
    }

    #[tokio::test]
    async fn test_rejects_missing_data_port() {
        let (mut server, mut client) = pair();
        client.send(Tag::List, b"").await.unwrap();

        let outcome = negotiate(&mut server).await.unwrap();
        assert_eq!(
            outcome,
            ControlOutcome::Rejected(Rejection::InvalidDataPort(Tag::List))
        );
        assert_eq!(
            client.recv().await.unwrap(),
            Packet::new(Tag::Error, INVALID_DATA_PORT)
        );
    }

    #[tokio::test]
    async fn test_peer_hangs_up_before_command() {
        let (mut server, mut client) = pair();
        client.send(Tag::Dport, b"30022").await.unwrap();
        drop(client);

        assert!(matches!(
            negotiate(&mut server).await,
            Err(ProtocolError::ConnectionClosed)
        ));
    }
}
