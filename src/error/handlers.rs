//! Error handlers
//!
//! Logs errors at the severity matching their tier.

use crate::error::types::ServerError;
use log::{error, warn};

/// Process exit status for unrecoverable failures
pub const FATAL_EXIT_CODE: i32 = 1;

/// Handle a server error, returning whether it is fatal under the given policy
pub fn handle_error(err: &ServerError, abort_on_transport_error: bool) -> bool {
    let fatal = err.is_fatal(abort_on_transport_error);
    if fatal {
        error!("Unrecoverable error: {}", err);
    } else {
        warn!("Session aborted: {}", err);
    }
    fatal
}
