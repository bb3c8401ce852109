//! Transfer result types
//!
//! Defines result structures returned by transfer operations.

/// Result of streaming one file over the data connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSendResult {
    pub bytes_sent: u64,
    pub chunks: usize,
    /// False when a read error cut the content short
    pub completed: bool,
}

/// How a LIST or GET ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    Listed { entries: usize },
    Sent(FileSendResult),
    FileNotFound(String),
    CannotOpen(String),
}

impl TransferOutcome {
    pub fn is_success(&self) -> bool {
        match self {
            TransferOutcome::Listed { .. } => true,
            TransferOutcome::Sent(result) => result.completed,
            TransferOutcome::FileNotFound(_) | TransferOutcome::CannotOpen(_) => false,
        }
    }
}
