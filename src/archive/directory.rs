// Tue Oct 13 2026 - Alex

use super::{encode_json, ArchiveError, ArchiveReader, ArchiveWriter};
use serde_json::Value;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Component, Path, PathBuf};

/// An unpacked profile: every regular file below `root` is an entry, named
/// by its `/`-separated path relative to `root`.
pub struct DirectoryReader {
    root: PathBuf,
    names: Vec<String>,
}

impl DirectoryReader {
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, ArchiveError> {
        let root = root.as_ref().to_path_buf();
        let mut names = Vec::new();
        collect_files(&root, &root, &mut names)?;
        names.sort();
        Ok(Self { root, names })
    }
}

fn collect_files(root: &Path, dir: &Path, names: &mut Vec<String>) -> Result<(), ArchiveError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(root, &path, names)?;
            continue;
        }

        if let Ok(relative) = path.strip_prefix(root) {
            let name = relative.components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            names.push(name);
        }
    }
    Ok(())
}

fn resolve(root: &Path, name: &str) -> Result<PathBuf, ArchiveError> {
    let relative = Path::new(name);
    let escapes = relative.components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if name.is_empty() || escapes {
        return Err(ArchiveError::InvalidName(name.to_string()));
    }
    Ok(root.join(relative))
}

impl ArchiveReader for DirectoryReader {
    fn list_files(&self) -> Vec<String> {
        self.names.clone()
    }

    fn open(&mut self, name: &str) -> Result<Vec<u8>, ArchiveError> {
        let path = resolve(&self.root, name)?;
        if !path.is_file() {
            return Err(ArchiveError::NotFound(name.to_string()));
        }
        Ok(fs::read(path)?)
    }
}

pub struct DirectoryWriter {
    root: PathBuf,
}

impl DirectoryWriter {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    fn create_file(&self, name: &str) -> Result<File, ArchiveError> {
        let path = resolve(&self.root, name)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(File::create(path)?)
    }
}

impl ArchiveWriter for DirectoryWriter {
    fn store_data(&mut self, name: &str, value: &Value) -> Result<(), ArchiveError> {
        let data = encode_json(value)?;
        self.create_file(name)?.write_all(&data)?;
        Ok(())
    }

    fn create(&mut self, name: &str) -> Result<Box<dyn Write + '_>, ArchiveError> {
        Ok(Box::new(self.create_file(name)?))
    }

    fn finish(&mut self) -> Result<(), ArchiveError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("profile-converter-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_directory_roundtrip() {
        let dir = scratch_dir("roundtrip");
        let mut writer = DirectoryWriter::new(&dir);
        writer.store_data("vtypes.json", &serde_json::json!({"list_head": [16, {}]})).unwrap();
        writer.create("boot/System.map").unwrap().write_all(b"c0100000 T _text\n").unwrap();

        let mut reader = DirectoryReader::open(&dir).unwrap();
        assert_eq!(reader.list_files(), vec!["boot/System.map".to_string(), "vtypes.json".to_string()]);
        assert_eq!(reader.open("boot/System.map").unwrap(), b"c0100000 T _text\n".to_vec());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_rejects_escaping_names() {
        let dir = scratch_dir("escape");
        let mut reader = DirectoryReader::open(&dir).unwrap();

        assert!(matches!(reader.open("../etc/passwd"), Err(ArchiveError::InvalidName(_))));
        assert!(matches!(reader.open("missing"), Err(ArchiveError::NotFound(_))));

        fs::remove_dir_all(&dir).unwrap();
    }
}
