//! Transfer operations
//!
//! Runs a validated command over the data connection. File-level failures
//! of a GET are reported on the control connection; every path ends with
//! `DONE` on the data connection followed by `CLOSE` on the control
//! connection.

use log::{info, warn};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::{ServerError, StorageError};
use crate::protocol::responses::{CANNOT_OPEN_FILE, FILE_NOT_FOUND};
use crate::protocol::{Command, PacketStream, Tag};
use crate::storage::Storage;
use crate::storage::results::find_entry;
use crate::transfer::file_ops::send_file;
use crate::transfer::listing::send_listing;
use crate::transfer::results::TransferOutcome;

/// Executes `command`, then sends the termination pair.
///
/// The listing is taken once per call and dropped when the call returns.
pub async fn run_data_transfer<C, D>(
    control: &mut PacketStream<C>,
    data: &mut PacketStream<D>,
    command: &Command,
    storage: &Storage,
) -> Result<TransferOutcome, ServerError>
where
    C: AsyncRead + AsyncWrite + Unpin,
    D: AsyncRead + AsyncWrite + Unpin,
{
    let entries = storage.list_files().await?;

    let outcome = match command {
        Command::List => {
            let sent = send_listing(data, &entries).await?;
            TransferOutcome::Listed { entries: sent }
        }
        Command::Get(filename) => match find_entry(&entries, filename) {
            None => {
                warn!("Requested file not found: {}", filename);
                control.send(Tag::Error, FILE_NOT_FOUND.as_bytes()).await?;
                TransferOutcome::FileNotFound(filename.clone())
            }
            Some(entry) => match storage.open(entry).await {
                Err(StorageError::CannotOpen(name, e)) => {
                    warn!("Cannot open {}: {}", name, e);
                    control.send(Tag::Error, CANNOT_OPEN_FILE.as_bytes()).await?;
                    TransferOutcome::CannotOpen(name)
                }
                Err(e) => return Err(e.into()),
                Ok(mut file) => {
                    TransferOutcome::Sent(send_file(data, &entry.name, &mut file).await?)
                }
            },
        },
    };

    data.send(Tag::Done, b"").await?;
    info!("Sending close on control connection");
    control.send(Tag::Close, b"").await?;

    Ok(outcome)
}
