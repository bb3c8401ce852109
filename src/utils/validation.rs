//! Input validation utilities
//!
//! Provides command-line argument validation.

/// Parses a port given on the command line.
///
/// Only plain decimal digits are accepted: no sign, whitespace or
/// trailing characters.
pub fn parse_port(input: &str) -> Result<u16, String> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("port must be a number, got {:?}", input));
    }
    input
        .parse::<u16>()
        .map_err(|_| format!("port {} is out of range", input))
}
