//! File system storage management
//!
//! Enumerates and opens the files offered by the server.

pub mod filesystem;
pub mod results;

pub use filesystem::Storage;
pub use results::FileEntry;
