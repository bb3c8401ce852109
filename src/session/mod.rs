//! Session management
//!
//! Per-connection state and the control-connection negotiation.

pub mod control;
pub mod results;
pub mod state;

pub use control::negotiate;
pub use results::{ControlOutcome, Negotiated, Rejection, SessionOutcome};
pub use state::{Session, SessionState};
