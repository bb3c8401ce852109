//! Module `file_ops`
//!
//! Streams one file over the data connection as a sequence of `FILE`
//! packets: the filename first, then content chunks of at most 512 bytes,
//! then an empty chunk marking the end of the content.

use log::{error, info};
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};

use crate::error::ProtocolError;
use crate::protocol::{MAX_PAYLOAD, PacketStream, Tag};
use crate::transfer::results::FileSendResult;

/// Sends `source` to the client under `name`.
///
/// A read error stops the stream where it is: whatever was read before the
/// error is still sent, the error is logged, no end-of-content chunk
/// follows and the result is marked incomplete. Errors writing to the data
/// connection are returned.
pub async fn send_file<S, R>(
    data: &mut PacketStream<S>,
    name: &str,
    source: &mut R,
) -> Result<FileSendResult, ProtocolError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    R: AsyncRead + Unpin,
{
    info!("Sending file {}", name);
    data.send(Tag::File, name.as_bytes()).await?;

    let mut buffer = [0u8; MAX_PAYLOAD];
    let mut result = FileSendResult {
        bytes_sent: 0,
        chunks: 0,
        completed: false,
    };

    loop {
        let (n, failure) = read_chunk(source, &mut buffer).await;

        if n > 0 || failure.is_none() {
            data.send(Tag::File, &buffer[..n]).await?;
        }
        if n > 0 {
            result.bytes_sent += n as u64;
            result.chunks += 1;
        }

        if let Some(e) = failure {
            error!(
                "Read error on {} after {} bytes: {}",
                name, result.bytes_sent, e
            );
            return Ok(result);
        }
        if n == 0 {
            break;
        }
    }

    result.completed = true;
    info!(
        "File {} sent ({} bytes in {} chunks)",
        name, result.bytes_sent, result.chunks
    );
    Ok(result)
}

/// Fills `buf` as far as the source allows. Returns less than a full
/// buffer only at end of file or alongside a read error, in which case the
/// count covers the bytes read before it.
async fn read_chunk<R>(source: &mut R, buf: &mut [u8]) -> (usize, Option<io::Error>)
where
    R: AsyncRead + Unpin,
{
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]).await {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) => return (filled, Some(e)),
        }
    }
    (filled, None)
}
