//! Directory listing over the data connection

use log::{info, warn};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::ProtocolError;
use crate::protocol::{MAX_PAYLOAD, PacketStream, Tag};
use crate::storage::FileEntry;

/// Sends one `FNAME` packet per entry, in listing order. Returns how many
/// names were sent.
///
/// A name too long for one packet is skipped.
pub async fn send_listing<S>(
    data: &mut PacketStream<S>,
    entries: &[FileEntry],
) -> Result<usize, ProtocolError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut sent = 0;
    for entry in entries {
        if entry.name.len() > MAX_PAYLOAD {
            warn!("Skipping {} byte file name in listing", entry.name.len());
            continue;
        }
        data.send(Tag::Fname, entry.name.as_bytes()).await?;
        sent += 1;
    }
    info!("Listed {} files", sent);
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Packet;

    #[tokio::test]
    async fn test_one_packet_per_name_in_order() {
        let (server, client) = tokio::io::duplex(4096);
        let mut data = PacketStream::new(server);
        let entries = vec![
            FileEntry::new("zeta.txt"),
            FileEntry::new("alpha.txt"),
            FileEntry::new("x".repeat(MAX_PAYLOAD + 1)),
            FileEntry::new("mid.txt"),
        ];

        assert_eq!(send_listing(&mut data, &entries).await.unwrap(), 3);
        drop(data);

        let mut client = PacketStream::new(client);
        for name in ["zeta.txt", "alpha.txt", "mid.txt"] {
            assert_eq!(client.recv().await.unwrap(), Packet::new(Tag::Fname, name));
        }
        assert!(client.recv().await.is_err());
    }
}
