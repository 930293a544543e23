// Tue Oct 13 2026 - Alex

use super::{encode_json, ArchiveError, ArchiveReader, ArchiveWriter};
use memmap2::Mmap;
use serde_json::Value;
use std::fs::File;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive};

pub struct ZipReader<R: Read + Seek> {
    archive: ZipArchive<R>,
    names: Vec<String>,
}

impl ZipReader<Cursor<Mmap>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ArchiveError> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file) }?;
        Self::from_reader(Cursor::new(mmap))
    }
}

impl<R: Read + Seek> ZipReader<R> {
    pub fn from_reader(reader: R) -> Result<Self, ArchiveError> {
        let archive = ZipArchive::new(reader)?;
        let names = archive.file_names()
            .filter(|name| !name.ends_with('/'))
            .map(str::to_string)
            .collect();
        Ok(Self { archive, names })
    }
}

impl<R: Read + Seek> ArchiveReader for ZipReader<R> {
    fn list_files(&self) -> Vec<String> {
        self.names.clone()
    }

    fn open(&mut self, name: &str) -> Result<Vec<u8>, ArchiveError> {
        let mut entry = match self.archive.by_name(name) {
            Ok(entry) => entry,
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(ArchiveError::NotFound(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data)?;
        Ok(data)
    }
}

pub struct ZipWriter<W: Write + Seek> {
    writer: Option<zip::ZipWriter<W>>,
    finished: Option<W>,
    options: SimpleFileOptions,
}

impl<W: Write + Seek> ZipWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: Some(zip::ZipWriter::new(inner)),
            finished: None,
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
        }
    }

    /// Finalizes the archive if needed and hands back the underlying sink.
    pub fn into_inner(mut self) -> Result<W, ArchiveError> {
        self.finish()?;
        self.finished.take().ok_or(ArchiveError::Finished)
    }

    fn active(&mut self) -> Result<&mut zip::ZipWriter<W>, ArchiveError> {
        self.writer.as_mut().ok_or(ArchiveError::Finished)
    }
}

impl<W: Write + Seek> ArchiveWriter for ZipWriter<W> {
    fn store_data(&mut self, name: &str, value: &Value) -> Result<(), ArchiveError> {
        let data = encode_json(value)?;
        let options = self.options;
        let writer = self.active()?;
        writer.start_file(name, options)?;
        writer.write_all(&data)?;
        Ok(())
    }

    fn create(&mut self, name: &str) -> Result<Box<dyn Write + '_>, ArchiveError> {
        let options = self.options;
        let writer = self.active()?;
        writer.start_file(name, options)?;
        Ok(Box::new(writer))
    }

    fn finish(&mut self) -> Result<(), ArchiveError> {
        if let Some(writer) = self.writer.take() {
            self.finished = Some(writer.finish()?);
        }
        Ok(())
    }
}
