//! Module `data_channel`
//!
//! The server opens the data connection itself, towards the port the
//! client announced. The client may still be getting its listener ready,
//! so refused attempts are retried a bounded number of times.

use log::{info, warn};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::sleep;

use crate::error::TransferError;

/// Connects to `addr`, trying up to `attempts` times with `retry_delay`
/// between tries.
pub async fn connect_data_channel(
    addr: SocketAddr,
    attempts: u32,
    retry_delay: Duration,
) -> Result<TcpStream, TransferError> {
    let attempts = attempts.max(1);
    let mut attempt = 1;

    loop {
        match TcpStream::connect(addr).await {
            Ok(stream) => {
                info!(
                    "Data connection established with {} (attempt {})",
                    addr, attempt
                );
                return Ok(stream);
            }
            Err(e) if attempt < attempts => {
                warn!(
                    "Data connection to {} failed (attempt {}/{}): {}. Retrying...",
                    addr, attempt, attempts, e
                );
                attempt += 1;
                sleep(retry_delay).await;
            }
            Err(source) => {
                return Err(TransferError::ConnectFailed {
                    addr,
                    attempts,
                    source,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_connects_to_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let stream = connect_data_channel(addr, 3, Duration::from_millis(10))
            .await
            .unwrap();
        let (_accepted, peer) = listener.accept().await.unwrap();
        assert_eq!(peer, stream.local_addr().unwrap());
    }

    #[tokio::test]
    async fn test_gives_up_after_attempts() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };

        let err = connect_data_channel(addr, 2, Duration::from_millis(10))
            .await
            .unwrap_err();
        match err {
            TransferError::ConnectFailed {
                addr: failed,
                attempts,
                ..
            } => {
                assert_eq!(failed, addr);
                assert_eq!(attempts, 2);
            }
        }
    }

    #[tokio::test]
    async fn test_retries_until_listener_appears() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };

        let late = tokio::spawn(async move {
            sleep(Duration::from_millis(50)).await;
            let listener = TcpListener::bind(addr).await.unwrap();
            listener.accept().await.unwrap();
        });

        connect_data_channel(addr, 10, Duration::from_millis(25))
            .await
            .unwrap();
        late.await.unwrap();
    }
}
