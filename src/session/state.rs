//! Module `state`
//!
//! Defines the `Session` struct holding what one client negotiated, and the
//! states a session moves through.

use std::fmt;
use std::net::SocketAddr;

use crate::protocol::Command;
use crate::session::results::Negotiated;

/// Where the orchestrator is within one client's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Listening,
    ControlAccepted,
    ControlNegotiated,
    DataConnected,
    Transferring,
    SessionClosed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Listening => "LISTENING",
            SessionState::ControlAccepted => "CONTROL_ACCEPTED",
            SessionState::ControlNegotiated => "CONTROL_NEGOTIATED",
            SessionState::DataConnected => "DATA_CONNECTED",
            SessionState::Transferring => "TRANSFERRING",
            SessionState::SessionClosed => "SESSION_CLOSED",
        };
        f.write_str(name)
    }
}

/// State of one accepted control connection.
///
/// Created on accept and dropped when the session ends; nothing in it
/// outlives the connection.
#[derive(Debug)]
pub struct Session {
    peer_addr: SocketAddr,
    state: SessionState,
    data_port: Option<u16>,
    command: Option<Command>,
}

impl Session {
    pub fn new(peer_addr: SocketAddr) -> Self {
        Self {
            peer_addr,
            state: SessionState::ControlAccepted,
            data_port: None,
            command: None,
        }
    }

    /// Records the outcome of a successful negotiation and returns where
    /// the data connection goes: the control peer's IP with the negotiated
    /// port.
    pub fn apply(&mut self, negotiated: &Negotiated) -> SocketAddr {
        self.data_port = Some(negotiated.data_port);
        self.command = Some(negotiated.command.clone());
        self.state = SessionState::ControlNegotiated;
        SocketAddr::new(self.peer_addr.ip(), negotiated.data_port)
    }

    // --------------------
    // Getter methods
    // --------------------

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    // --------------------
    // Setter methods
    // --------------------

    pub fn set_state(&mut self, state: SessionState) {
        self.state = state;
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}", self.peer_addr, self.state)?;
        if let Some(command) = &self.command {
            write!(f, " {}", command.tag())?;
        }
        if let Some(port) = self.data_port {
            write!(f, " data port {}", port)?;
        }
        f.write_str("]")
    }
}
