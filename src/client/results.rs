//! Client result types

use std::path::PathBuf;

/// What became of a requested file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Saved { path: PathBuf, bytes: u64 },
    /// A local file with that name exists; the content was discarded
    AlreadyExists(String),
    /// The server stopped before the end-of-content marker
    Incomplete { name: String, bytes: u64 },
}

/// Everything one client run observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientReport {
    /// Whether the server answered the command with `OKAY`
    pub accepted: bool,
    pub listing: Vec<String>,
    pub download: Option<DownloadOutcome>,
    /// `ERROR` messages received on the control connection
    pub errors: Vec<String>,
}
