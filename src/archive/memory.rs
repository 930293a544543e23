// Tue Oct 13 2026 - Alex

use super::{encode_json, ArchiveError, ArchiveReader, ArchiveWriter};
use serde_json::Value;
use std::io::Write;

/// Entries held in memory, listed in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    entries: Vec<(String, Vec<u8>)>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, name: &str, data: impl Into<Vec<u8>>) -> Self {
        self.insert(name, data.into());
        self
    }

    pub fn insert(&mut self, name: &str, data: Vec<u8>) {
        self.entries.retain(|(existing, _)| existing != name);
        self.entries.push((name.to_string(), data));
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries.iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, data)| data.as_slice())
    }

    pub fn get_json(&self, name: &str) -> Option<Value> {
        self.get(name).and_then(|data| serde_json::from_slice(data).ok())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ArchiveReader for MemoryArchive {
    fn list_files(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    fn open(&mut self, name: &str) -> Result<Vec<u8>, ArchiveError> {
        self.get(name)
            .map(<[u8]>::to_vec)
            .ok_or_else(|| ArchiveError::NotFound(name.to_string()))
    }
}

impl ArchiveWriter for MemoryArchive {
    fn store_data(&mut self, name: &str, value: &Value) -> Result<(), ArchiveError> {
        let data = encode_json(value)?;
        self.insert(name, data);
        Ok(())
    }

    fn create(&mut self, name: &str) -> Result<Box<dyn Write + '_>, ArchiveError> {
        self.insert(name, Vec::new());
        let (_, data) = self.entries.last_mut().ok_or_else(|| ArchiveError::NotFound(name.to_string()))?;
        Ok(Box::new(data))
    }

    fn finish(&mut self) -> Result<(), ArchiveError> {
        Ok(())
    }
}
