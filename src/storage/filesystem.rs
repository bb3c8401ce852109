//! File system operations
//!
//! Every name is joined onto the served directory before it is inspected
//! or opened, so the server does not depend on its working directory
//! matching the directory it serves.

use log::debug;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};

use crate::error::StorageError;
use crate::storage::results::FileEntry;

/// The directory whose files are listed and served.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists the regular files of the served directory, in the order the
    /// directory iterator yields them. Directories, FIFOs, sockets and
    /// devices are left out.
    ///
    /// Symlinks are followed the way `stat` does; a link that cannot be
    /// resolved is still listed and will fail to open later.
    pub async fn list_files(&self) -> Result<Vec<FileEntry>, StorageError> {
        let unreadable =
            |e: std::io::Error| StorageError::DirectoryUnreadable(self.root.clone(), e);

        let mut dir = fs::read_dir(&self.root).await.map_err(unreadable)?;
        let mut entries = Vec::new();

        while let Some(entry) = dir.next_entry().await.map_err(unreadable)? {
            match fs::metadata(entry.path()).await {
                Ok(metadata) if metadata.is_file() => {}
                Ok(_) => {
                    debug!("Skipping {}: not a regular file", entry.path().display());
                    continue;
                }
                Err(e) => debug!("Cannot stat {}: {}", entry.path().display(), e),
            }
            entries.push(FileEntry::new(entry.file_name().to_string_lossy()));
        }

        Ok(entries)
    }

    /// Opens a listed file for reading.
    pub async fn open(&self, entry: &FileEntry) -> Result<File, StorageError> {
        File::open(self.root.join(&entry.name))
            .await
            .map_err(|e| StorageError::CannotOpen(entry.name.clone(), e))
    }
}
