//! Module `commands`
//!
//! Interprets the client's negotiation packets: the data port announcement
//! and the LIST/GET request.

use crate::protocol::codec::Packet;
use crate::protocol::tags::Tag;

/// A validated client request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Get(String),
}

impl Command {
    /// Builds a command from the request packet.
    ///
    /// Only the tag is validated. A GET payload is taken as the filename
    /// as-is (an empty name simply never matches); a LIST payload is ignored.
    pub fn from_packet(packet: &Packet) -> Option<Command> {
        match packet.tag {
            Tag::List => Some(Command::List),
            Tag::Get => Some(Command::Get(packet.payload_str().into_owned())),
            _ => None,
        }
    }

    pub fn tag(&self) -> Tag {
        match self {
            Command::List => Tag::List,
            Command::Get(_) => Tag::Get,
        }
    }
}

/// Extracts the data port from a `DPORT` packet.
///
/// The payload must be a plain decimal number naming a non-zero port.
pub fn parse_data_port(packet: &Packet) -> Option<u16> {
    if packet.tag != Tag::Dport {
        return None;
    }
    let text = std::str::from_utf8(&packet.payload).ok()?;
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<u16>().ok().filter(|&port| port != 0)
}
