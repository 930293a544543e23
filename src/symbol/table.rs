// Wed Oct 14 2026 - Alex

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Symbol name to address. Kept sorted so serialized profiles are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolTable {
    symbols: BTreeMap<String, u64>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `name` at `address`; a repeated name takes the later address.
    pub fn add(&mut self, name: &str, address: u64) {
        self.symbols.insert(name.to_string(), address);
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.symbols.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn max_address(&self) -> Option<u64> {
        self.symbols.values().copied().max()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.symbols.iter()
                .map(|(name, address)| (name.clone(), Value::from(*address)))
                .collect(),
        )
    }
}

impl FromIterator<(String, u64)> for SymbolTable {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self { symbols: iter.into_iter().collect() }
    }
}

/// Parses a hex address, with or without a `0x` prefix.
pub(crate) fn parse_hex(text: &str) -> Option<u64> {
    let digits = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}
