// Wed Oct 14 2026 - Alex

use super::common::{entry_pattern, ConverterContext};
use super::{ConvertError, ProfileConverter};
use crate::dwarf::{DwarfDumpParser, ModuleParser};
use crate::profile::{infer_profile_class, MODULE_ENTRY};
use crate::symbol::{parse_system_map, SymbolTable};
use crate::vtype::{self, LINUX_TYPES};
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

const FAMILY: &str = "Linux";

static SYSTEM_MAP: Lazy<Regex> = Lazy::new(|| entry_pattern("(^|/)System.map"));
static KERNEL_MODULE: Lazy<Regex> = Lazy::new(|| entry_pattern(r"\.ko$"));
static DWARF_DUMP: Lazy<Regex> = Lazy::new(|| entry_pattern(r"\.dwarf$"));
static JSON_TYPES: Lazy<Regex> = Lazy::new(|| entry_pattern(r"\.json$"));

/// Linux profiles are a `System.map` plus one type source: a compiled
/// module, a `dwarfdump` listing, or a ready-made JSON table.
pub struct LinuxConverter<'a> {
    ctx: ConverterContext<'a>,
}

impl<'a> LinuxConverter<'a> {
    pub fn new(ctx: ConverterContext<'a>) -> Self {
        Self { ctx }
    }

    fn convert_module(&mut self, symbols: SymbolTable, module: Vec<u8>) -> Result<(), ConvertError> {
        info!("Converting Linux profile with ko module.");
        let vtypes = ModuleParser::new(&module)?.type_table()?;
        self.write_profile(symbols, vtypes)?;
        self.ctx.copy_raw(MODULE_ENTRY, &module)
    }

    fn convert_dwarf_dump(&mut self, symbols: SymbolTable, dump: String) -> Result<(), ConvertError> {
        info!("Converting Linux profile with dwarf dump.");
        let mut parser = DwarfDumpParser::new();
        for line in dump.lines() {
            parser.feed_line(line);
        }
        debug!("Read {} debug entries", parser.entries_seen());

        let source = parser.generate_source();
        let vtypes = vtype::extract(&source, LINUX_TYPES)?;
        self.write_profile(symbols, vtypes)
    }
}

impl ProfileConverter for LinuxConverter<'_> {
    fn convert(&mut self) -> Result<(), ConvertError> {
        let Some(system_map) = self.ctx.select_file(&SYSTEM_MAP)? else {
            return Err(ConvertError::FormatNotRecognized);
        };
        let symbols = parse_system_map(&system_map);
        debug!("Parsed {} symbols from System.map", symbols.len());

        if let Some(module) = self.ctx.select_bytes(&KERNEL_MODULE)? {
            return self.convert_module(symbols, module);
        }

        if let Some(dump) = self.ctx.select_file(&DWARF_DUMP)? {
            return self.convert_dwarf_dump(symbols, dump);
        }

        if let Some(json) = self.ctx.select_file(&JSON_TYPES)? {
            info!("Converting Linux profile with vtypes dump.");
            let vtypes: Value = serde_json::from_str(&json)?;
            return self.write_profile(symbols, vtypes);
        }

        Err(ConvertError::FormatNotRecognized)
    }

    fn write_profile(&mut self, symbols: SymbolTable, vtypes: Value) -> Result<(), ConvertError> {
        if self.ctx.profile_class.is_none() {
            self.ctx.profile_class = infer_profile_class(FAMILY, &symbols);
        }
        self.ctx.write_profile(&symbols, &vtypes)
    }
}
