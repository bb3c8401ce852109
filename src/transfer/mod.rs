//! Transfer module
//!
//! Opens the data connection back to the client and runs LIST or GET
//! over it, finishing with the DONE/CLOSE termination pair.

pub mod data_channel;
pub mod file_ops;
pub mod listing;
pub mod operations;
pub mod results;

// Re-export key types and functions
pub use data_channel::connect_data_channel;
pub use file_ops::send_file;
pub use listing::send_listing;
pub use operations::run_data_transfer;
pub use results::{FileSendResult, TransferOutcome};
