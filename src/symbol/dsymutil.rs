// Wed Oct 14 2026 - Alex

use super::table::{parse_hex, SymbolTable};
use super::SymbolError;
use once_cell::sync::Lazy;
use regex::Regex;

static STAB_SYMBOL: Lazy<Regex> = Lazy::new(|| Regex::new(r"([^ ]+) '([^ ]+)'$").unwrap());

const SYMBOL_TABLE_HEADER: &str = "Symbol table for";
const SYMBOL_KINDS: [&str; 3] = ["N_FUN", "N_GSYM", "N_STSYM"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bitness {
    Bits32,
    Bits64,
}

impl Bitness {
    pub fn suffix(self) -> &'static str {
        match self {
            Bitness::Bits32 => "32",
            Bitness::Bits64 => "64",
        }
    }
}

#[derive(Debug, Default)]
pub struct DsymutilDump {
    pub symbols: SymbolTable,
    pub bitness: Option<Bitness>,
}

/// Parses `dsymutil -s` output.
///
/// The architecture header is only inspected while `bitness_known` is false
/// and no earlier header has been seen; an unknown architecture there is an
/// error. Function, global and static stab entries become symbols.
pub fn parse_dsymutil(text: &str, bitness_known: bool) -> Result<DsymutilDump, SymbolError> {
    let mut dump = DsymutilDump::default();

    for line in text.lines() {
        if !bitness_known && dump.bitness.is_none() && line.contains(SYMBOL_TABLE_HEADER) {
            let marker = line.split_whitespace().last().unwrap_or_default();
            dump.bitness = Some(match marker {
                "(x86_64)" => Bitness::Bits64,
                "(i386)" => Bitness::Bits32,
                other => return Err(SymbolError::UnknownArchitecture(other.to_string())),
            });
        }

        if !SYMBOL_KINDS.iter().any(|kind| line.contains(kind)) {
            continue;
        }

        if let Some(caps) = STAB_SYMBOL.captures(line) {
            if let Some(address) = parse_hex(&caps[1]) {
                dump.symbols.add(&caps[2], address);
            }
        }
    }

    Ok(dump)
}
