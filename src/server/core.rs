use log::{debug, info};
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};

use crate::error::ServerError;
use crate::error::handlers::handle_error;
use crate::protocol::PacketStream;
use crate::server::config::ServerConfig;
use crate::session::{ControlOutcome, Session, SessionOutcome, SessionState, negotiate};
use crate::storage::Storage;
use crate::transfer::{connect_data_channel, run_data_transfer};

/// Accepts one client at a time and runs its session to completion
/// before accepting the next.
pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
    storage: Storage,
}

impl Server {
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let control_socket = config.control_socket();
        let listener = TcpListener::bind(&control_socket)
            .await
            .map_err(|e| ServerError::Bind(control_socket.clone(), e))?;
        info!("Server bound to {}", control_socket);
        let storage = Storage::new(config.server_root.clone());
        info!("Serving files from {}", storage.root().display());

        Ok(Self {
            listener,
            config,
            storage,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop until `shutdown` resolves or a fatal error
    /// occurs.
    ///
    /// Shutdown is checked while waiting for a client and while a session
    /// is in flight; an interrupted session is dropped, which closes both
    /// of its sockets. The listener is released when this returns.
    pub async fn run<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            debug!("State: {}", SessionState::Listening);
            let (stream, peer_addr) = tokio::select! {
                _ = &mut shutdown => break,
                accepted = self.listener.accept() => accepted.map_err(ServerError::Accept)?,
            };

            let result = tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown interrupted session with {}", peer_addr);
                    break;
                }
                result = self.serve_session(stream, peer_addr) => result,
            };

            match result {
                Ok(SessionOutcome::Rejected(reason)) => {
                    info!("Session with {} rejected: {:?}", peer_addr, reason);
                    debug!("State: {} ({})", SessionState::SessionClosed, peer_addr);
                }
                Ok(SessionOutcome::Completed(outcome)) => {
                    info!(
                        "Session with {} finished ({}): {:?}",
                        peer_addr,
                        if outcome.is_success() { "ok" } else { "failed" },
                        outcome
                    );
                }
                Err(err) => {
                    if handle_error(&err, self.config.abort_on_transport_error) {
                        return Err(err);
                    }
                }
            }
        }

        info!("Server shutting down");
        Ok(())
    }

    /// Drives one session from an accepted control connection to both
    /// sockets closed. Sockets are owned here and close on every return.
    async fn serve_session(
        &self,
        stream: TcpStream,
        peer_addr: SocketAddr,
    ) -> Result<SessionOutcome, ServerError> {
        let mut session = Session::new(peer_addr);
        info!("Control connection established with {}", peer_addr.ip());
        debug!("Session {}", session);

        let io_timeout = self.config.io_timeout();
        let mut control = PacketStream::with_timeout(stream, io_timeout);

        let negotiated = match negotiate(&mut control).await? {
            ControlOutcome::Accepted(negotiated) => negotiated,
            ControlOutcome::Rejected(reason) => return Ok(SessionOutcome::Rejected(reason)),
        };
        let data_addr = session.apply(&negotiated);
        debug!("Session {}", session);

        let data_stream = connect_data_channel(
            data_addr,
            self.config.connect_attempts,
            self.config.connect_retry_delay(),
        )
        .await?;
        session.set_state(SessionState::DataConnected);
        debug!("Session {}", session);
        let mut data = PacketStream::with_timeout(data_stream, io_timeout);

        session.set_state(SessionState::Transferring);
        debug!("Session {}", session);
        let outcome =
            run_data_transfer(&mut control, &mut data, &negotiated.command, &self.storage).await?;

        // The client acknowledges the data phase before the data socket closes
        let ack = control.recv().await?;
        debug!("Client acknowledged with {}", ack.tag);
        drop(data);
        info!("Data connection closed");

        session.set_state(SessionState::SessionClosed);
        debug!("State: {} ({})", session.state(), session.peer_addr());
        Ok(SessionOutcome::Completed(outcome))
    }
}
