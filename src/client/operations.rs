//! Client operations
//!
//! One run is one session: negotiate on the control connection, receive on
//! the data connection, acknowledge, then read the control connection until
//! the server says `CLOSE`.

use log::{debug, info, warn};
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpSocket, TcpStream, lookup_host};

use crate::client::options::ClientOptions;
use crate::client::results::{ClientReport, DownloadOutcome};
use crate::error::ClientError;
use crate::protocol::{PacketStream, Tag};

const DATA_BACKLOG: u32 = 5;

/// Runs one request against the server.
///
/// The data listener is bound before anything is sent, so the server's
/// connection attempt never races the client. With `data_port` 0 the
/// system picks the port and that port is announced.
pub async fn run(options: &ClientOptions) -> Result<ClientReport, ClientError> {
    options.validate()?;

    let server_addr = resolve(&options.host, options.server_port).await?;
    let listener = bind_data_listener(server_addr, options.data_port)?;
    let data_port = listener.local_addr()?.port();

    let control_stream = TcpStream::connect(server_addr)
        .await
        .map_err(|e| ClientError::Connect(server_addr.to_string(), e))?;
    info!("Control connection established with {}", server_addr);
    let mut control = PacketStream::new(control_stream);
    let mut report = ClientReport::default();

    debug!("Sending data port {}", data_port);
    control
        .send(Tag::Dport, data_port.to_string().as_bytes())
        .await?;
    debug!("Sending command {}", options.request.tag());
    control
        .send(options.request.tag(), options.request.payload())
        .await?;

    let reply = control.recv().await?;
    match reply.tag {
        Tag::Okay => report.accepted = true,
        Tag::Error => {
            report.errors.push(reply.payload_str().into_owned());
            return Ok(report);
        }
        other => return Err(ClientError::UnexpectedPacket(other.to_string())),
    }

    let (data_stream, peer) = listener.accept().await?;
    info!("Data connection established with {}", peer.ip());
    let mut data = PacketStream::new(data_stream);
    receive_data(&mut data, &options.download_dir, &mut report).await?;

    control.send(Tag::Ack, b"").await?;
    loop {
        let packet = control.recv().await?;
        match packet.tag {
            Tag::Error => report.errors.push(packet.payload_str().into_owned()),
            Tag::Close => break,
            other => debug!("Ignoring {} on control connection", other),
        }
    }

    info!("Transfer connections closed");
    Ok(report)
}

async fn resolve(host: &str, port: u16) -> Result<SocketAddr, ClientError> {
    let addrs: Vec<SocketAddr> = lookup_host((host, port))
        .await
        .map_err(|e| ClientError::Resolve(host.to_string(), e))?
        .collect();

    addrs
        .iter()
        .find(|addr| addr.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| {
            ClientError::Resolve(
                host.to_string(),
                io::Error::new(io::ErrorKind::NotFound, "no addresses"),
            )
        })
}

/// Listens on `port` in the same address family as the server, since the
/// server connects back to the address the control connection came from.
fn bind_data_listener(server_addr: SocketAddr, port: u16) -> Result<TcpListener, ClientError> {
    listen_on(server_addr, port).map_err(|e| ClientError::DataListener(port, e))
}

fn listen_on(server_addr: SocketAddr, port: u16) -> io::Result<TcpListener> {
    let (socket, any) = match server_addr {
        SocketAddr::V4(_) => (TcpSocket::new_v4()?, IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
        SocketAddr::V6(_) => (TcpSocket::new_v6()?, IpAddr::V6(Ipv6Addr::UNSPECIFIED)),
    };
    socket.set_reuseaddr(true)?;
    socket.bind(SocketAddr::new(any, port))?;
    socket.listen(DATA_BACKLOG)
}

/// Reads the data connection up to `DONE`.
///
/// `DONE` with nothing before it is an empty listing or a GET the server
/// refused; the refusal itself arrives on the control connection.
async fn receive_data<S>(
    data: &mut PacketStream<S>,
    download_dir: &Path,
    report: &mut ClientReport,
) -> Result<(), ClientError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let first = data.recv().await?;
    match first.tag {
        Tag::Done => Ok(()),
        Tag::Fname => {
            let mut packet = first;
            while packet.tag != Tag::Done {
                if packet.tag == Tag::Fname {
                    report.listing.push(packet.payload_str().into_owned());
                } else {
                    debug!("Ignoring {} in listing", packet.tag);
                }
                packet = data.recv().await?;
            }
            Ok(())
        }
        Tag::File => {
            let name = first.payload_str().into_owned();
            report.download = Some(receive_file(data, &name, download_dir).await?);
            Ok(())
        }
        other => Err(ClientError::UnexpectedPacket(other.to_string())),
    }
}

/// Writes the announced file into `download_dir`, never overwriting an
/// existing file. The content is read to the end either way.
async fn receive_file<S>(
    data: &mut PacketStream<S>,
    name: &str,
    download_dir: &Path,
) -> Result<DownloadOutcome, ClientError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let file_name = Path::new(name)
        .file_name()
        .map(PathBuf::from)
        .ok_or_else(|| ClientError::UnexpectedPacket(format!("FILE {:?}", name)))?;
    let path = download_dir.join(file_name);

    let mut file: Option<File> = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await
    {
        Ok(file) => Some(file),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            warn!(
                "File {} already exists, discarding download",
                path.display()
            );
            None
        }
        Err(e) => return Err(e.into()),
    };

    let mut bytes = 0u64;
    let mut ended = false;
    loop {
        let packet = data.recv().await?;
        match packet.tag {
            Tag::Done => break,
            Tag::File if packet.payload.is_empty() => ended = true,
            Tag::File => {
                bytes += packet.payload.len() as u64;
                if let Some(file) = file.as_mut() {
                    file.write_all(&packet.payload).await?;
                }
            }
            other => return Err(ClientError::UnexpectedPacket(other.to_string())),
        }
    }

    let Some(mut file) = file else {
        return Ok(DownloadOutcome::AlreadyExists(name.to_string()));
    };
    file.flush().await?;
    drop(file);

    if ended {
        info!("Saved {} ({} bytes)", path.display(), bytes);
        Ok(DownloadOutcome::Saved { path, bytes })
    } else {
        warn!("Transfer of {} ended early, removing partial file", name);
        fs::remove_file(&path).await?;
        Ok(DownloadOutcome::Incomplete {
            name: name.to_string(),
            bytes,
        })
    }
}
