//! ftserver - Entry Point
//!
//! Serves directory listings and files to one client at a time over a
//! control connection and a server-initiated data connection.

use clap::Parser;
use log::{info, warn};
use std::process::exit;

use ftransfer::error::ServerError;
use ftransfer::error::handlers::{FATAL_EXIT_CODE, handle_error};
use ftransfer::utils::{parse_port, setup_logging};
use ftransfer::{Server, ServerConfig};

#[derive(Parser, Debug)]
#[command(
    name = "ftserver",
    version,
    about = "Serve file listings and downloads"
)]
struct Cli {
    /// TCP port to accept control connections on
    #[arg(value_parser = parse_port)]
    port: u16,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { FATAL_EXIT_CODE } else { 0 };
            let _ = e.print();
            exit(code);
        }
    };

    if let Err(e) = serve(cli.port).await {
        eprintln!("ftserver: {}", e);
        exit(FATAL_EXIT_CODE);
    }

    println!("\nftserver: Server closed, have a nice day!");
}

/// Loads configuration, binds and runs until interrupted. Every error that
/// reaches this point is fatal.
async fn serve(port: u16) -> Result<(), ServerError> {
    let config = ServerConfig::load(port).map_err(|e| fatal(e.into()))?;
    let server = Server::bind(config).await.map_err(fatal)?;

    println!("ftserver: Server open on port {}", port);
    server.run(shutdown_signal()).await
}

fn fatal(err: ServerError) -> ServerError {
    handle_error(&err, true);
    err
}

/// Resolves on the first Ctrl-C
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Interrupt received"),
        Err(e) => {
            warn!("Cannot listen for interrupts, running until killed: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
