//! Read-only access to zip archives holding auxiliary resources.
//!
//! An [`ArchiveReader`] owns its file handle until [`ArchiveReader::close`] is
//! called or the reader is dropped. Any use after closing fails with
//! [`ArchiveError::Closed`].

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

/// Errors raised by [`ArchiveReader`]
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("file name must not be null")]
    MissingFileName,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid archive: {0}")]
    InvalidArchive(#[from] ZipError),

    #[error("entry not found: {0}")]
    EntryNotFound(String),

    #[error("archive reader has already been closed")]
    Closed,
}

impl ArchiveError {
    /// True when the reader was used after being closed
    pub fn is_illegal_state(&self) -> bool {
        matches!(self, ArchiveError::Closed)
    }
}

/// Zip archive reader
pub struct ArchiveReader {
    archive: Option<ZipArchive<File>>,
}

impl ArchiveReader {
    /// Open the archive at `path`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ArchiveError> {
        let path = path.ok_or(ArchiveError::MissingFileName)?;
        let file = File::open(path.as_ref())?;
        let archive = ZipArchive::new(file)?;
        debug!(path = %path.as_ref().display(), entries = archive.len(), "opened archive");
        Ok(Self {
            archive: Some(archive),
        })
    }

    /// Open `path`, run `f`, and close the archive whatever `f` returns
    pub fn with_archive<P, T, F>(path: P, f: F) -> Result<T, ArchiveError>
    where
        P: AsRef<Path>,
        F: FnOnce(&mut ArchiveReader) -> Result<T, ArchiveError>,
    {
        let mut reader = Self::open(Some(path))?;
        let result = f(&mut reader);
        reader.close();
        result
    }

    pub fn is_closed(&self) -> bool {
        self.archive.is_none()
    }

    /// Names of the file entries, with `\` separators written as `/`
    pub fn entry_names(&self) -> Result<BTreeSet<String>, ArchiveError> {
        let archive = self.archive.as_ref().ok_or(ArchiveError::Closed)?;
        Ok(archive
            .file_names()
            .map(normalize_entry_name)
            .filter(|name| !name.ends_with('/'))
            .collect())
    }

    /// Read the whole content of entry `name`
    pub fn read_entry(&mut self, name: Option<&str>) -> Result<Vec<u8>, ArchiveError> {
        let archive = self.archive.as_mut().ok_or(ArchiveError::Closed)?;
        let name = name.ok_or(ArchiveError::MissingFileName)?;
        let not_found = || ArchiveError::EntryNotFound(name.to_string());

        if name.ends_with('/') {
            return Err(not_found());
        }

        // Stored names may use either separator
        let stored = archive
            .file_names()
            .find(|stored| normalize_entry_name(stored) == name)
            .map(str::to_string)
            .ok_or_else(not_found)?;

        let mut entry = match archive.by_name(&stored) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Err(not_found()),
            Err(e) => return Err(e.into()),
        };
        if entry.is_dir() {
            return Err(not_found());
        }

        let mut data = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
        entry.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Release the file handle. Later calls fail with [`ArchiveError::Closed`].
    pub fn close(&mut self) {
        if self.archive.take().is_some() {
            debug!("closed archive");
        }
    }
}

impl Drop for ArchiveReader {
    fn drop(&mut self) {
        self.close();
    }
}

fn normalize_entry_name(name: &str) -> String {
    name.replace('\\', "/")
}
