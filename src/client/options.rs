//! Client options

use std::path::PathBuf;

use crate::error::ClientError;
use crate::protocol::Tag;

/// What to ask the server for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    List,
    Get(String),
}

impl Request {
    pub fn tag(&self) -> Tag {
        match self {
            Request::List => Tag::List,
            Request::Get(_) => Tag::Get,
        }
    }

    pub fn payload(&self) -> &[u8] {
        match self {
            Request::List => b"",
            Request::Get(name) => name.as_bytes(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub host: String,
    pub server_port: u16,
    /// Port to receive the data connection on; 0 picks any free port
    pub data_port: u16,
    pub request: Request,
    /// Where downloaded files are written
    pub download_dir: PathBuf,
}

impl ClientOptions {
    pub fn new(
        host: impl Into<String>,
        server_port: u16,
        data_port: u16,
        request: Request,
    ) -> Self {
        Self {
            host: host.into(),
            server_port,
            data_port,
            request,
            download_dir: PathBuf::from("."),
        }
    }

    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.data_port != 0 && self.data_port == self.server_port {
            return Err(ClientError::Usage(
                "Server port and data port cannot be the same!".into(),
            ));
        }
        if matches!(&self.request, Request::Get(name) if name.is_empty()) {
            return Err(ClientError::Usage("A filename is required with -g".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_same_ports() {
        let options = ClientOptions::new("localhost", 30021, 30021, Request::List);
        assert!(matches!(options.validate(), Err(ClientError::Usage(_))));
    }

    #[test]
    fn test_validate_allows_ephemeral_data_port() {
        let options = ClientOptions::new("localhost", 30021, 0, Request::List);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_request_wire_form() {
        let get = Request::Get("a.txt".to_string());
        assert_eq!(get.tag(), Tag::Get);
        assert_eq!(get.payload(), b"a.txt");
        assert_eq!(Request::List.payload(), b"");
    }
}
