//! Transfer client
//!
//! The counterpart of the server: announces a data port, requests a listing
//! or a file, accepts the server's data connection and collects the result.

pub mod operations;
pub mod options;
pub mod results;

pub use operations::run;
pub use options::{ClientOptions, Request};
pub use results::{ClientReport, DownloadOutcome};
