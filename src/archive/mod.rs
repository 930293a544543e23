// Tue Oct 13 2026 - Alex

//! Named-entry containers that profiles are read from and written to.
//!
//! Converters only ever see the two traits below. Which backend sits behind
//! them (zip file, directory, in-memory map) is decided by the caller.

pub mod error;
pub mod directory;
pub mod memory;
pub mod single;
pub mod zip_archive;

pub use error::ArchiveError;
pub use directory::{DirectoryReader, DirectoryWriter};
pub use memory::MemoryArchive;
pub use single::SingleFile;
pub use zip_archive::{ZipReader, ZipWriter};

use serde_json::Value;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub trait ArchiveReader {
    /// Entry names in the order the container lists them.
    fn list_files(&self) -> Vec<String>;

    fn open(&mut self, name: &str) -> Result<Vec<u8>, ArchiveError>;
}

pub trait ArchiveWriter {
    /// Serializes `value` as JSON into a new entry.
    fn store_data(&mut self, name: &str, value: &Value) -> Result<(), ArchiveError>;

    /// Opens a new entry for raw bytes. The sink must be dropped before the
    /// next entry is created.
    fn create(&mut self, name: &str) -> Result<Box<dyn Write + '_>, ArchiveError>;

    fn finish(&mut self) -> Result<(), ArchiveError>;
}

/// Opens `path` read-only. Directories are read as unpacked profiles,
/// anything else as a zip archive.
pub fn open_reader<P: AsRef<Path>>(path: P) -> Result<Box<dyn ArchiveReader>, ArchiveError> {
    let path = path.as_ref();
    if path.is_dir() {
        Ok(Box::new(DirectoryReader::open(path)?))
    } else {
        Ok(Box::new(ZipReader::open(path)?))
    }
}

/// Creates the output container at `path`. An existing directory receives
/// the entries as plain files, otherwise a new zip archive is written.
pub fn create_writer<P: AsRef<Path>>(path: P) -> Result<Box<dyn ArchiveWriter>, ArchiveError> {
    let path = path.as_ref();
    if path.is_dir() {
        Ok(Box::new(DirectoryWriter::new(path)))
    } else {
        let file = File::create(path)?;
        Ok(Box::new(ZipWriter::new(file)))
    }
}

pub(crate) fn encode_json(value: &Value) -> Result<Vec<u8>, ArchiveError> {
    Ok(serde_json::to_vec(value)?)
}
