// Wed Oct 14 2026 - Alex

use super::ConvertError;
use crate::archive::{ArchiveReader, ArchiveWriter};
use crate::profile::ProfileWriter;
use crate::symbol::SymbolTable;
use log::debug;
use regex::{Regex, RegexBuilder};
use serde_json::Value;

/// Compiles a case-insensitive entry-name pattern.
pub(crate) fn entry_pattern(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .unwrap()
}

/// State every converter variant shares: the archive pair it is bound to
/// and the profile class, once known.
pub struct ConverterContext<'a> {
    input: &'a mut dyn ArchiveReader,
    output: &'a mut dyn ArchiveWriter,
    pub profile_class: Option<String>,
}

impl<'a> ConverterContext<'a> {
    pub fn new(
        input: &'a mut dyn ArchiveReader,
        output: &'a mut dyn ArchiveWriter,
        profile_class: Option<String>,
    ) -> Self {
        Self { input, output, profile_class }
    }

    /// Raw contents of the first entry whose name matches `pattern`.
    pub fn select_bytes(&mut self, pattern: &Regex) -> Result<Option<Vec<u8>>, ConvertError> {
        let Some(name) = self.input.list_files().into_iter().find(|name| pattern.is_match(name)) else {
            return Ok(None);
        };
        debug!("Selected {} for {}", name, pattern.as_str());
        Ok(Some(self.input.open(&name)?))
    }

    /// Like [`select_bytes`](Self::select_bytes), decoded as text.
    pub fn select_file(&mut self, pattern: &Regex) -> Result<Option<String>, ConvertError> {
        Ok(self.select_bytes(pattern)?
            .map(|data| String::from_utf8_lossy(&data).into_owned()))
    }

    pub fn first_file(&mut self) -> Result<Option<String>, ConvertError> {
        let Some(name) = self.input.list_files().into_iter().next() else {
            return Ok(None);
        };
        let data = self.input.open(&name)?;
        Ok(Some(String::from_utf8_lossy(&data).into_owned()))
    }

    pub fn write_profile(&mut self, symbols: &SymbolTable, vtypes: &Value) -> Result<(), ConvertError> {
        ProfileWriter::new(&mut *self.output).write(self.profile_class.as_deref(), symbols, vtypes)
    }

    pub fn copy_raw(&mut self, name: &str, data: &[u8]) -> Result<(), ConvertError> {
        ProfileWriter::new(&mut *self.output).copy_raw(name, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::MemoryArchive;

    #[test]
    fn test_select_first_match_case_insensitive() {
        let mut input = MemoryArchive::new()
            .with_file("boot/system.map-3.0.0", "first")
            .with_file("System.map", "second");
        let mut output = MemoryArchive::new();
        let mut ctx = ConverterContext::new(&mut input, &mut output, None);

        let pattern = entry_pattern("(^|/)System.map");
        assert_eq!(ctx.select_file(&pattern).unwrap().as_deref(), Some("first"));
    }

    #[test]
    fn test_select_missing_is_none() {
        let mut input = MemoryArchive::new().with_file("notes.txt", "x");
        let mut output = MemoryArchive::new();
        let mut ctx = ConverterContext::new(&mut input, &mut output, None);

        assert_eq!(ctx.select_file(&entry_pattern(r"\.ko$")).unwrap(), None);
    }

    #[test]
    fn test_marker_needs_segment_start() {
        let pattern = entry_pattern("(^|/)System.map");
        assert!(pattern.is_match("System.map"));
        assert!(pattern.is_match("ubuntu/boot/SYSTEM.MAP"));
        assert!(!pattern.is_match("OldSystem.map"));
    }
}
