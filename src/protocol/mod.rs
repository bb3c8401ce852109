//! Packet protocol implementation
//!
//! Handles the wire format, the tag vocabulary, command parsing, and
//! response messages.

pub mod codec;
pub mod commands;
pub mod responses;
pub mod tags;

pub use codec::{MAX_PAYLOAD, Packet, PacketStream, decode, encode};
pub use commands::{Command, parse_data_port};
pub use tags::Tag;
