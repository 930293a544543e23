// Wed Oct 14 2026 - Alex

use super::common::ConverterContext;
use super::{ConvertError, ProfileConverter};
use crate::symbol::SymbolTable;
use crate::vtype::{self, WINDOWS_TYPES};
use log::info;
use serde_json::Value;

/// Windows type descriptions carry no symbols and no architecture hint, so
/// this converter is only ever picked by name and needs an explicit class.
pub struct WindowsConverter<'a> {
    ctx: ConverterContext<'a>,
}

impl<'a> WindowsConverter<'a> {
    pub fn new(ctx: ConverterContext<'a>) -> Self {
        Self { ctx }
    }
}

impl ProfileConverter for WindowsConverter<'_> {
    fn convert(&mut self) -> Result<(), ConvertError> {
        if self.ctx.profile_class.is_none() {
            return Err(ConvertError::ProfileClassRequired);
        }

        let Some(source) = self.ctx.first_file()? else {
            return Err(ConvertError::FormatNotRecognized);
        };

        info!("Converting Windows profile from type description.");
        let vtypes = vtype::extract(&source, WINDOWS_TYPES)?;
        self.write_profile(SymbolTable::new(), vtypes)
    }

    fn write_profile(&mut self, symbols: SymbolTable, vtypes: Value) -> Result<(), ConvertError> {
        self.ctx.write_profile(&symbols, &vtypes)
    }
}
