//! Session result types

use crate::protocol::{Command, Tag};
use crate::transfer::TransferOutcome;

/// What a successful control negotiation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negotiated {
    pub command: Command,
    pub data_port: u16,
}

/// Why a control negotiation was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    InvalidDataPort(Tag),
    InvalidCommand(Tag),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlOutcome {
    Accepted(Negotiated),
    Rejected(Rejection),
}

/// How a whole session ended, for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Rejected(Rejection),
    Completed(TransferOutcome),
}
