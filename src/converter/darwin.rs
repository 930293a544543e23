// Wed Oct 14 2026 - Alex

use super::common::{entry_pattern, ConverterContext};
use super::{ConvertError, ProfileConverter};
use crate::profile::{infer_profile_class, variant_name};
use crate::symbol::{parse_dsymutil, SymbolTable};
use crate::vtype::{self, MAC_TYPES};
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

const FAMILY: &str = "Darwin";

static DSYMUTIL_DUMP: Lazy<Regex> = Lazy::new(|| entry_pattern("dsymutil$"));
static VTYPES_SOURCE: Lazy<Regex> = Lazy::new(|| entry_pattern(r"\.vtypes$"));
static JSON_TYPES: Lazy<Regex> = Lazy::new(|| entry_pattern(r"\.json$"));

/// OSX profiles pair a `dsymutil -s` listing with a `mac_types` source or
/// a JSON type table.
pub struct DarwinConverter<'a> {
    ctx: ConverterContext<'a>,
}

impl<'a> DarwinConverter<'a> {
    pub fn new(ctx: ConverterContext<'a>) -> Self {
        Self { ctx }
    }
}

impl ProfileConverter for DarwinConverter<'_> {
    fn convert(&mut self) -> Result<(), ConvertError> {
        let Some(listing) = self.ctx.select_file(&DSYMUTIL_DUMP)? else {
            return Err(ConvertError::FormatNotRecognized);
        };

        let dump = parse_dsymutil(&listing, self.ctx.profile_class.is_some())?;
        if let Some(bitness) = dump.bitness {
            self.ctx.profile_class = Some(variant_name(FAMILY, bitness));
        }
        debug!("Parsed {} symbols from dsymutil listing", dump.symbols.len());

        if let Some(source) = self.ctx.select_file(&VTYPES_SOURCE)? {
            info!("Converting Darwin profile with vtypes dump.");
            let vtypes = vtype::extract(&source, MAC_TYPES)?;
            return self.write_profile(dump.symbols, vtypes);
        }

        if let Some(json) = self.ctx.select_file(&JSON_TYPES)? {
            info!("Converting Darwin profile with json dump.");
            let vtypes: Value = serde_json::from_str(&json)?;
            return self.write_profile(dump.symbols, vtypes);
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
