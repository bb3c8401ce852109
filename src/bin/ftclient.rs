//! ftclient - Entry Point
//!
//! Lists the files a server offers (`-l`) or downloads one of them (`-g`).

use clap::{ArgGroup, Parser};
use std::process::exit;

use ftransfer::client::{self, ClientOptions, DownloadOutcome, Request};
use ftransfer::error::handlers::FATAL_EXIT_CODE;
use ftransfer::utils::{parse_port, setup_logging};

#[derive(Parser, Debug)]
#[command(
    name = "ftclient",
    version,
    about = "List or fetch files from an ftserver"
)]
#[command(group(ArgGroup::new("command").required(true)))]
struct Cli {
    /// Server host name or address
    server_host: String,

    /// Server control port
    #[arg(value_parser = parse_port)]
    server_port: u16,

    /// List the files on the server
    #[arg(short = 'l', group = "command")]
    list: bool,

    /// Download a file from the server
    #[arg(short = 'g', value_name = "FILENAME", group = "command")]
    get: Option<String>,

    /// Local port the server connects back to
    #[arg(value_parser = parse_port)]
    data_port: u16,
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

    let request = match cli.get {
        Some(name) => Request::Get(name),
        None => Request::List,
    };
    let options = ClientOptions::new(&cli.server_host, cli.server_port, cli.data_port, request);

    let report = match client::run(&options).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("ftclient: {}", e);
            exit(FATAL_EXIT_CODE);
        }
    };

    if report.accepted && options.request == Request::List {
        println!("ftclient: List of files on \"{}\"", cli.server_host);
        for name in &report.listing {
            println!("  {}", name);
        }
    }

    match &report.download {
        Some(DownloadOutcome::Saved { .. }) => {
            println!("ftclient: Success, file transfer completed!");
        }
        Some(DownloadOutcome::AlreadyExists(name)) => {
            println!("ftclient: File \"{}\" already exists!", name);
        }
        Some(DownloadOutcome::Incomplete { name, bytes }) => {
            println!(
                "ftclient: Transfer of \"{}\" stopped after {} bytes",
                name, bytes
            );
        }
        None => {}
    }

    for message in &report.errors {
        println!("ftclient: {}", message);
    }

    if report.accepted {
        println!("ftclient: File transfer connections closed, have a nice day!");
    }
}
