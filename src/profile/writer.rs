// Wed Oct 14 2026 - Alex

use super::{ProfileMetadata, CONSTANTS_ENTRY, METADATA_ENTRY, VTYPES_ENTRY};
use crate::archive::ArchiveWriter;
use crate::converter::ConvertError;
use crate::symbol::SymbolTable;
use log::{debug, info};
use serde_json::Value;
use std::io::Write;

/// Writes profiles into an output archive it borrows for one conversion.
pub struct ProfileWriter<'a> {
    output: &'a mut dyn ArchiveWriter,
}

impl<'a> ProfileWriter<'a> {
    pub fn new(output: &'a mut dyn ArchiveWriter) -> Self {
        Self { output }
    }

    /// Writes the constants, the type table and the metadata record.
    /// Both tables go out with sorted keys.
    pub fn write(&mut self, profile_class: Option<&str>, symbols: &SymbolTable, vtypes: &Value) -> Result<(), ConvertError> {
        let profile_class = profile_class.ok_or(ConvertError::UnresolvedArchitecture)?;

        self.output.store_data(CONSTANTS_ENTRY, &symbols.to_json())?;
        self.output.store_data(VTYPES_ENTRY, vtypes)?;

        let metadata = serde_json::to_value(ProfileMetadata::new(profile_class))?;
        self.output.store_data(METADATA_ENTRY, &metadata)?;

        info!("Wrote {} profile with {} constants", profile_class, symbols.len());
        Ok(())
    }

    /// Carries an opaque blob through unchanged.
    pub fn copy_raw(&mut self, name: &str, data: &[u8]) -> Result<(), ConvertError> {
        let mut sink = self.output.create(name)?;
        sink.write_all(data).map_err(crate::archive::ArchiveError::from)?;
        debug!("Copied {} bytes to {}", data.len(), name);
        Ok(())
    }
}
