//! File system collaborator used by `FileStore`.
//!
//! `FileStore` never touches `std::fs` directly; everything goes through
//! [`FileIo`] so tests can substitute an in-memory file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use bytes::Bytes;
use flatstore_core_store::Error;

/// The handful of operations a backing file needs.
///
/// All operations are whole-file: reads return the complete content, writes
/// replace it.
pub trait FileIo: Send + Sync {
    /// Location of the file, used for naming and error messages.
    fn path(&self) -> &Path;

    fn exists(&self) -> Result<bool, Error>;

    /// Create an empty file, including missing parent directories.
    fn create(&self) -> Result<(), Error>;

    fn read(&self) -> Result<Bytes, Error>;

    /// Replace the complete file content.
    fn write(&self, bytes: &[u8]) -> Result<(), Error>;

    /// Last modification time of the file.
    fn modified(&self) -> Result<SystemTime, Error>;

    /// Remove the file. Fails if it doesn't exist.
    fn delete(&self) -> Result<(), Error>;
}

/// A file on the local disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalFile {
    path: PathBuf,
}

impl LocalFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: io::Error) -> Error {
        Error::io(self.path.clone(), source)
    }
}

impl FileIo for LocalFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn exists(&self) -> Result<bool, Error> {
        self.path.try_exists().map_err(|e| self.io_error(e))
    }

    fn create(&self) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        log::debug!("Creating {}...", self.path.display());
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        Ok(())
    }

    fn read(&self) -> Result<Bytes, Error> {
        log::debug!("Reading {}...", self.path.display());
        fs::read(&self.path)
            .map(Bytes::from)
            .map_err(|e| self.io_error(e))
    }

    fn write(&self, bytes: &[u8]) -> Result<(), Error> {
        log::debug!("Writing {} bytes to {}...", bytes.len(), self.path.display());
        fs::write(&self.path, bytes).map_err(|e| self.io_error(e))
    }

    fn modified(&self) -> Result<SystemTime, Error> {
        fs::metadata(&self.path)
            .and_then(|attr| attr.modified())
            .map_err(|e| self.io_error(e))
    }

    fn delete(&self) -> Result<(), Error> {
        log::debug!("Deleting {}...", self.path.display());
        fs::remove_file(&self.path).map_err(|e| self.io_error(e))
    }
}
