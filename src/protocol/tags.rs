//! Packet tags
//!
//! The fixed 8-byte tag field identifies what a packet carries.

use std::fmt;

/// Width of the tag field on the wire
pub const TAG_LENGTH: usize = 8;

/// Tag vocabulary spoken on the control and data connections.
///
/// Anything outside the vocabulary is kept verbatim in `Other` so the
/// control session can reject it by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Dport,
    List,
    Get,
    Okay,
    Error,
    Fname,
    File,
    Done,
    Close,
    Ack,
    Other(String),
}

impl Tag {
    pub fn as_str(&self) -> &str {
        match self {
            Tag::Dport => "DPORT",
            Tag::List => "LIST",
            Tag::Get => "GET",
            Tag::Okay => "OKAY",
            Tag::Error => "ERROR",
            Tag::Fname => "FNAME",
            Tag::File => "FILE",
            Tag::Done => "DONE",
            Tag::Close => "CLOSE",
            Tag::Ack => "ACK",
            Tag::Other(raw) => raw,
        }
    }

    /// Case-sensitive lookup; unknown names become `Other`.
    pub fn parse(raw: &str) -> Tag {
        match raw {
            "DPORT" => Tag::Dport,
            "LIST" => Tag::List,
            "GET" => Tag::Get,
            "OKAY" => Tag::Okay,
            "ERROR" => Tag::Error,
            "FNAME" => Tag::Fname,
            "FILE" => Tag::File,
            "DONE" => Tag::Done,
            "CLOSE" => Tag::Close,
            "ACK" => Tag::Ack,
            other => Tag::Other(other.to_string()),
        }
    }

    /// Reads a tag field, stopping at the first NUL.
    pub fn from_wire(field: &[u8; TAG_LENGTH]) -> Tag {
        let end = field.iter().position(|&b| b == 0).unwrap_or(TAG_LENGTH);
        Tag::parse(&String::from_utf8_lossy(&field[..end]))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_tags() {
        assert_eq!(Tag::parse("DPORT"), Tag::Dport);
        assert_eq!(Tag::parse("GET"), Tag::Get);
        assert_eq!(Tag::parse("CLOSE"), Tag::Close);
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!(Tag::parse("list"), Tag::Other("list".to_string()));
        assert_eq!(Tag::parse("DELETE"), Tag::Other("DELETE".to_string()));
    }

    #[test]
    fn test_from_wire_stops_at_nul() {
        assert_eq!(Tag::from_wire(b"FNAME\0\0\0"), Tag::Fname);
        assert_eq!(Tag::from_wire(b"LIST\0XYZ"), Tag::List);
        assert_eq!(
            Tag::from_wire(b"ABCDEFGH"),
            Tag::Other("ABCDEFGH".to_string())
        );
    }
}
