// Wed Oct 14 2026 - Alex

//! Reading type descriptions written as data-structure source.
//!
//! Legacy profiles ship their type tables as source files holding one big
//! `name = { ... }` assignment. Only the literal on the right-hand side is
//! parsed here; nothing in the file is ever evaluated.

pub mod error;
pub mod literal;

pub use error::VTypeError;
pub use literal::LiteralParser;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Structure names the legacy tooling assigns its tables to.
pub const LINUX_TYPES: &str = "linux_types";
pub const MAC_TYPES: &str = "mac_types";
pub const WINDOWS_TYPES: &str = "ntkrnlmp_types";

/// Extracts the literal assigned to the top-level name `name` in `source`.
pub fn extract(source: &str, name: &str) -> Result<Value, VTypeError> {
    if !IDENTIFIER.is_match(name) {
        return Err(VTypeError::NotFound(name.to_string()));
    }

    let assignment = Regex::new(&format!(r"(?m)^{}[ \t]*=", regex::escape(name)))
        .map_err(|_| VTypeError::NotFound(name.to_string()))?;

    // A later binding replaces an earlier one; `==` is a comparison.
    let start = assignment.find_iter(source)
        .filter(|m| !source[m.end()..].starts_with('='))
        .last()
        .map(|m| m.end())
        .ok_or_else(|| VTypeError::NotFound(name.to_string()))?;
    let line = source[..start].matches('\n').count() + 1;

    LiteralParser::new(&source[start..])
        .with_first_line(line)
        .parse_assigned_value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_named_structure() {
        let source = "\
import sys

other_types = {'a': [1, {}]}
mac_types = {
  'proc' : [ 0x210, {
    'p_pid' : [ 0x10, ['int']],
  }],
}
";
        let types = extract(source, MAC_TYPES).unwrap();
        assert_eq!(types, json!({"proc": [0x210, {"p_pid": [0x10, ["int"]]}]}));
    }

    #[test]
    fn test_indented_assignment_is_not_top_level() {
        let source = "def f():\n    linux_types = {}\n";
        assert_eq!(extract(source, LINUX_TYPES), Err(VTypeError::NotFound(LINUX_TYPES.to_string())));
    }

    #[test]
    fn test_comparison_is_not_assignment() {
        let source = "ntkrnlmp_types == 1\nntkrnlmp_types = {'_LIST_ENTRY': [16, {}]}\n";
        assert_eq!(extract(source, WINDOWS_TYPES).unwrap(), json!({"_LIST_ENTRY": [16, {}]}));
    }

    #[test]
    fn test_last_binding_wins() {
        let source = "mac_types = {}\nmac_types = {'proc': [1, {}]}\n";
        assert_eq!(extract(source, MAC_TYPES).unwrap(), json!({"proc": [1, {}]}));
    }

    #[test]
    fn test_multibyte_after_equals() {
        let source = "mac_types =\u{e9}{}\n";
        assert!(matches!(extract(source, MAC_TYPES), Err(VTypeError::Syntax { line: 1, .. })));

        let source = "mac_types =\u{e9}\nmac_types = {'a': [1, {}]}\n";
        assert_eq!(extract(source, MAC_TYPES).unwrap(), json!({"a": [1, {}]}));
    }

    #[test]
    fn test_call_is_rejected() {
        let source = "linux_types = __import__('os').system('true')\n";
        assert!(matches!(extract(source, LINUX_TYPES), Err(VTypeError::Syntax { line: 1, .. })));
    }
}
