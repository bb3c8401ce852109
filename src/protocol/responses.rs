//! Response messages
//!
//! Human-readable payloads carried by `ERROR` packets.

pub const INVALID_COMMAND: &str = "Command must be either -l or -g";
pub const INVALID_DATA_PORT: &str = "Data port must be a number";
pub const FILE_NOT_FOUND: &str = "Error: File not found";
pub const CANNOT_OPEN_FILE: &str = "Error: cannot open file";
