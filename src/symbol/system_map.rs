// Wed Oct 14 2026 - Alex

use super::table::{parse_hex, SymbolTable};

/// Parses `nm`-style `<address> <type> <name>` lines.
///
/// Lines with any other shape, such as module symbols carrying a fourth
/// `[module]` column, or with a bad address, are skipped.
pub fn parse_system_map(text: &str) -> SymbolTable {
    let mut table = SymbolTable::new();

    for line in text.lines() {
        let mut fields = line.split_whitespace();
        let (Some(address), Some(_kind), Some(symbol), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            continue;
        };

        if let Some(address) = parse_hex(address) {
            table.add(symbol, address);
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_three_field_lines() {
        let table = parse_system_map("\
ffffffff81000000 T _text
ffffffff81000000 T startup_64
00000000000000a0 A irq_stack_union
");
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("_text"), Some(0xffffffff81000000));
        assert_eq!(table.get("irq_stack_union"), Some(0xa0));
    }

    #[test]
    fn test_skips_malformed_lines() {
        let table = parse_system_map("\
c0100000 T _text

c0100010
c0100020 T
c0100030 t helper [ext4]
zzzz T not_hex
-100 T negative
c0100040 T kept
");
        assert_eq!(table.len(), 2);
        assert!(table.contains("_text"));
        assert!(table.contains("kept"));
        assert!(!table.contains("not_hex"));
        assert!(!table.contains("negative"));
    }

    #[test]
    fn test_last_duplicate_wins() {
        let table = parse_system_map("c0000001 T dup\nc0000002 t dup\n");
        assert_eq!(table.get("dup"), Some(0xc0000002));
    }
}
