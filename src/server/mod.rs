//! Server core functionality
//!
//! This module contains the accept loop that sequences each client's
//! control and data connections, and the server configuration.

pub mod config;
pub mod core;

pub use config::ServerConfig;
pub use core::Server;
