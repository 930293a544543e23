// Wed Oct 14 2026 - Alex

use crate::symbol::{Bitness, SymbolTable};

const MAX_32BIT_ADDRESS: u64 = u32::MAX as u64;

pub fn variant_name(family: &str, bitness: Bitness) -> String {
    format!("{}{}", family, bitness.suffix())
}

/// Guesses the word size from the highest symbol address. Returns `None`
/// when the table gives nothing to go on (empty, or every address zero).
pub fn infer_profile_class(family: &str, symbols: &SymbolTable) -> Option<String> {
    let largest = symbols.max_address().filter(|&address| address != 0)?;
    let bitness = if largest > MAX_32BIT_ADDRESS {
        Bitness::Bits64
    } else {
        Bitness::Bits32
    };
    Some(variant_name(family, bitness))
}
