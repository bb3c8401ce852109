//! Packet codec
//!
//! Wire format, all fields back to back with no delimiter:
//!
//! ```text
//! +-----------------+------------------+---------------------------+
//! | length (2, BE)  | tag (8, NUL pad) | payload (length - 10)     |
//! +-----------------+------------------+---------------------------+
//! ```
//!
//! The length field counts the whole packet, header included. The payload
//! length is never sent on its own.

use std::borrow::Cow;
use std::future::Future;
use std::time::Duration;

use log::trace;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::ProtocolError;
use crate::protocol::tags::{TAG_LENGTH, Tag};

/// Size of the big-endian length field
pub const LENGTH_FIELD: usize = 2;
/// Length field plus tag field
pub const HEADER_LENGTH: usize = LENGTH_FIELD + TAG_LENGTH;
/// Largest payload a single packet may carry
pub const MAX_PAYLOAD: usize = 512;

/// One decoded packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub tag: Tag,
    pub payload: Vec<u8>,
}

impl Packet {
    pub fn new(tag: Tag, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            tag,
            payload: payload.into(),
        }
    }

    /// Payload as text, replacing invalid UTF-8.
    pub fn payload_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }
}

/// Builds the wire form of one packet.
pub fn encode(tag: &Tag, payload: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    let tag_bytes = tag.as_str().as_bytes();
    if tag_bytes.len() > TAG_LENGTH {
        return Err(ProtocolError::TagTooLong(tag.to_string()));
    }
    if payload.len() > MAX_PAYLOAD {
        return Err(ProtocolError::PayloadTooLarge(payload.len()));
    }

    // Bounded by HEADER_LENGTH + MAX_PAYLOAD, always fits in u16
    let total = (HEADER_LENGTH + payload.len()) as u16;

    let mut frame = Vec::with_capacity(usize::from(total));
    frame.extend_from_slice(&total.to_be_bytes());
    let mut tag_field = [0u8; TAG_LENGTH];
    tag_field[..tag_bytes.len()].copy_from_slice(tag_bytes);
    frame.extend_from_slice(&tag_field);
    frame.extend_from_slice(payload);
    Ok(frame)
}

/// Reads exactly one packet.
///
/// `read_exact` keeps reading until each field is complete, so a packet
/// split over any number of short reads decodes the same as one delivered
/// whole. End of stream part way through is `ConnectionClosed`.
pub async fn decode<R>(reader: &mut R) -> Result<Packet, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    let mut length_field = [0u8; LENGTH_FIELD];
    reader.read_exact(&mut length_field).await?;
    let total = u16::from_be_bytes(length_field);
    let total_len = usize::from(total);
    if !(HEADER_LENGTH..=HEADER_LENGTH + MAX_PAYLOAD).contains(&total_len) {
        return Err(ProtocolError::InvalidLength(total));
    }

    let mut tag_field = [0u8; TAG_LENGTH];
    reader.read_exact(&mut tag_field).await?;

    let mut payload = vec![0u8; total_len - HEADER_LENGTH];
    reader.read_exact(&mut payload).await?;

    Ok(Packet {
        tag: Tag::from_wire(&tag_field),
        payload,
    })
}

/// Encodes and writes one packet, looping until every byte is flushed.
pub async fn write_packet<W>(writer: &mut W, tag: &Tag, payload: &[u8]) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    let frame = encode(tag, payload)?;
    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}

/// A byte stream speaking the packet protocol.
///
/// Without an I/O timeout every call blocks until the peer makes progress.
pub struct PacketStream<S> {
    inner: S,
    io_timeout: Option<Duration>,
}

impl<S> PacketStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(inner: S) -> Self {
        Self::with_timeout(inner, None)
    }

    pub fn with_timeout(inner: S, io_timeout: Option<Duration>) -> Self {
        Self { inner, io_timeout }
    }

    pub async fn recv(&mut self) -> Result<Packet, ProtocolError> {
        let packet = bounded(self.io_timeout, decode(&mut self.inner)).await?;
        trace!("<- {} ({} bytes)", packet.tag, packet.payload.len());
        Ok(packet)
    }

    pub async fn send(&mut self, tag: Tag, payload: &[u8]) -> Result<(), ProtocolError> {
        trace!("-> {} ({} bytes)", tag, payload.len());
        let write = write_packet(&mut self.inner, &tag, payload);
        bounded(self.io_timeout, write).await
    }
}

async fn bounded<T, F>(limit: Option<Duration>, fut: F) -> Result<T, ProtocolError>
where
    F: Future<Output = Result<T, ProtocolError>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| ProtocolError::TimedOut(limit))?,
        None => fut.await,
    }
}
