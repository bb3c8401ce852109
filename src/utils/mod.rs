//! Utility functions
//!
//! Logging setup and command-line input validation shared by both binaries.

pub mod logging;
pub mod validation;

pub use logging::setup_logging;
pub use validation::parse_port;
