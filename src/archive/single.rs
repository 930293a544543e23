// Tue Oct 13 2026 - Alex

use super::{ArchiveError, ArchiveReader};
use std::fs;
use std::path::Path;

/// Presents one plain file as an archive with a single entry, for inputs
/// that are a bare type description rather than a profile container.
pub struct SingleFile {
    name: String,
    data: Vec<u8>,
}

impl SingleFile {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ArchiveError> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let name = path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, data })
    }

    pub fn from_bytes(name: &str, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.to_string(),
            data: data.into(),
        }
    }
}

impl ArchiveReader for SingleFile {
    fn list_files(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn open(&mut self, name: &str) -> Result<Vec<u8>, ArchiveError> {
        if name != self.name {
            return Err(ArchiveError::NotFound(name.to_string()));
        }
        Ok(self.data.clone())
    }
}
