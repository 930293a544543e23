// Wed Oct 14 2026 - Alex

use super::builder::LayoutBuilder;
use super::entry::{DebugEntry, EntryAttributes, EntryTag};
use crate::vtype::LINUX_TYPES;
use once_cell::sync::Lazy;
use regex::Regex;

static HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*<\s*(\d+)\s*><\s*([0-9a-fA-Fx+]+)\s*>\s*<?(DW_TAG_\w+)>?(.*)$").unwrap()
});

static BRACKETED_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(DW_AT_\w+)<((?:<[^<>]*>|[^<>])*)>").unwrap()
});

static PLAIN_ATTR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(DW_AT_\w+)\s+(.+?)\s*$").unwrap());

/// Incremental parser for `dwarfdump -di` text output.
///
/// Two layouts are understood: one line per entry with `DW_AT_x<value>`
/// pairs after the header, and a header line followed by indented
/// `DW_AT_x  value` lines. Anything else is noise and is dropped.
pub struct DwarfDumpParser {
    stack: Vec<(usize, DebugEntry)>,
    builder: LayoutBuilder,
    entries: usize,
}

impl DwarfDumpParser {
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            builder: LayoutBuilder::new(),
            entries: 0,
        }
    }

    pub fn feed_line(&mut self, line: &str) {
        if let Some(caps) = HEADER.captures(line) {
            let Ok(level) = caps[1].parse::<usize>() else {
                return;
            };
            let Some(offset) = parse_offset(&caps[2]) else {
                return;
            };

            let mut entry = DebugEntry::new(offset, EntryTag::from_name(&caps[3]));
            apply_attributes(&mut entry.attrs, &caps[4]);
            self.open_entry(level, entry);
            return;
        }

        if let Some((_, current)) = self.stack.last_mut() {
            apply_attributes(&mut current.attrs, line);
        }
    }

    pub fn entries_seen(&self) -> usize {
        self.entries
    }

    /// Closes all open units and renders the collected layouts as a
    /// `linux_types = { ... }` type description.
    pub fn generate_source(mut self) -> String {
        while !self.stack.is_empty() {
            self.close_top();
        }
        format!("{} = {:#}\n", LINUX_TYPES, self.builder.type_table())
    }

    fn open_entry(&mut self, level: usize, entry: DebugEntry) {
        self.entries += 1;

        while matches!(self.stack.last(), Some((open, _)) if *open >= level) {
            self.close_top();
        }

        if self.stack.is_empty() && level > 0 {
            self.stack.push((0, DebugEntry::new(0, EntryTag::CompileUnit)));
        }
        self.stack.push((level, entry));
    }

    fn close_top(&mut self) {
        let Some((_, entry)) = self.stack.pop() else {
            return;
        };
        match self.stack.last_mut() {
            Some((_, parent)) => parent.children.push(entry),
            None => self.builder.add_unit(&entry),
        }
    }
}

impl Default for DwarfDumpParser {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_attributes(attrs: &mut EntryAttributes, text: &str) {
    let mut matched = false;
    for caps in BRACKETED_ATTR.captures_iter(text) {
        matched = true;
        apply_attribute(attrs, &caps[1], &caps[2]);
    }

    if !matched {
        if let Some(caps) = PLAIN_ATTR.captures(text) {
            apply_attribute(attrs, &caps[1], &caps[2]);
        }
    }
}

fn apply_attribute(attrs: &mut EntryAttributes, name: &str, value: &str) {
    match name {
        "DW_AT_name" => {
            let name = value.trim().trim_matches('"');
            if !name.is_empty() {
                attrs.name = Some(name.to_string());
            }
        }
        "DW_AT_byte_size" => attrs.byte_size = last_number(value),
        "DW_AT_type" => attrs.type_ref = first_number(value),
        "DW_AT_data_member_location" => attrs.member_location = last_number(value),
        "DW_AT_bit_size" => attrs.bit_size = last_number(value),
        "DW_AT_bit_offset" => attrs.bit_offset = last_number(value),
        "DW_AT_data_bit_offset" => attrs.data_bit_offset = last_number(value),
        "DW_AT_upper_bound" => attrs.upper_bound = last_number(value),
        "DW_AT_count" => attrs.count = last_number(value),
        "DW_AT_const_value" => attrs.const_value = last_signed(value),
        "DW_AT_declaration" => attrs.declaration = value.trim_start().starts_with("yes") || value.trim() == "1",
        _ => {}
    }
}

/// Statement ids look like `0x2d`, `45` or `0x0+0x2d`; the last component
/// is the offset inside the unit.
fn parse_offset(text: &str) -> Option<u64> {
    text.rsplit('+').next().and_then(parse_number)
}

fn tokens(value: &str) -> impl Iterator<Item = &str> {
    value.split(|c: char| c.is_whitespace() || matches!(c, '<' | '>' | '(' | ')' | ','))
        .filter(|t| !t.is_empty())
        .map(|t| t.rsplit('=').next().unwrap_or(t))
}

fn first_number(value: &str) -> Option<u64> {
    tokens(value).find_map(parse_number)
}

fn last_number(value: &str) -> Option<u64> {
    tokens(value).filter_map(parse_number).last()
}

fn last_signed(value: &str) -> Option<i64> {
    tokens(value)
        .filter_map(|t| match t.strip_prefix('-') {
            Some(rest) => parse_number(rest).map(|n| (n as i64).wrapping_neg()),
            None => parse_number(t).map(|n| n as i64),
        })
        .last()
}

fn parse_number(token: &str) -> Option<u64> {
    let token = token.trim();
    match token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => token.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vtype;
    use serde_json::json;

    const ONE_LINE_DUMP: &str = "\
.debug_info

COMPILE_UNIT<header overall offset = 0x00000000>:
<0><0x0+0xb><DW_TAG_compile_unit> DW_AT_producer<GNU C 4.6.3> DW_AT_name<module.c>
<1><0x2d><DW_TAG_base_type> DW_AT_byte_size<0x00000004> DW_AT_encoding<DW_ATE_signed> DW_AT_name<int>
<1><0x34><DW_TAG_base_type> DW_AT_byte_size<0x00000001> DW_AT_encoding<DW_ATE_signed_char> DW_AT_name<char>
<1><0x3b><DW_TAG_structure_type> DW_AT_name<task_struct> DW_AT_byte_size<0x00000018>
<2><0x44><DW_TAG_member> DW_AT_name<pid> DW_AT_type<<0x0000002d>> DW_AT_data_member_location<DW_OP_plus_uconst 0>
<2><0x50><DW_TAG_member> DW_AT_name<comm> DW_AT_type<<0x00000060>> DW_AT_data_member_location<DW_OP_plus_uconst 4>
<1><0x60><DW_TAG_array_type> DW_AT_type<<0x00000034>>
<2><0x69><DW_TAG_subrange_type> DW_AT_type<<0x0000002d>> DW_AT_upper_bound<0x0000000f>
";

    const MULTI_LINE_DUMP: &str = "\
<0><   11>\tDW_TAG_compile_unit
\t\tDW_AT_name                  fs.c
<1><   45>\tDW_TAG_base_type
\t\tDW_AT_byte_size             8
\t\tDW_AT_name                  long unsigned int
<1><   52>\tDW_TAG_structure_type
\t\tDW_AT_name                  inode
\t\tDW_AT_byte_size             16
<2><   60>\tDW_TAG_member
\t\tDW_AT_name                  i_ino
\t\tDW_AT_type                  <45>
\t\tDW_AT_data_member_location  DW_OP_plus_uconst 8
";

    fn parse(dump: &str) -> serde_json::Value {
        let mut parser = DwarfDumpParser::new();
        for line in dump.lines() {
            parser.feed_line(line);
        }
        let source = parser.generate_source();
        vtype::extract(&source, LINUX_TYPES).unwrap()
    }

    #[test]
    fn test_one_line_format() {
        let types = parse(ONE_LINE_DUMP);
        assert_eq!(types, json!({
            "task_struct": [24, {
                "pid": [0, ["int"]],
                "comm": [4, ["Array", {"count": 16, "target": "char"}]],
            }],
        }));
    }

    #[test]
    fn test_multi_line_format() {
        let types = parse(MULTI_LINE_DUMP);
        assert_eq!(types["inode"], json!([16, {"i_ino": [8, ["unsigned long"]]}]));
    }

    #[test]
    fn test_units_are_scoped() {
        let dump = "\
<0><0xb><DW_TAG_compile_unit> DW_AT_name<a.c>
<1><0x2d><DW_TAG_base_type> DW_AT_byte_size<0x4> DW_AT_name<int>
<1><0x30><DW_TAG_structure_type> DW_AT_name<first> DW_AT_byte_size<0x4>
<2><0x38><DW_TAG_member> DW_AT_name<x> DW_AT_type<<0x2d>> DW_AT_data_member_location<0>
<0><0xb><DW_TAG_compile_unit> DW_AT_name<b.c>
<1><0x2d><DW_TAG_base_type> DW_AT_byte_size<0x1> DW_AT_name<char>
<1><0x30><DW_TAG_structure_type> DW_AT_name<second> DW_AT_byte_size<0x1>
<2><0x38><DW_TAG_member> DW_AT_name<c> DW_AT_type<<0x2d>> DW_AT_data_member_location<0>
";
        let types = parse(dump);
        assert_eq!(types["first"][1]["x"], json!([0, ["int"]]));
        assert_eq!(types["second"][1]["c"], json!([0, ["char"]]));
    }

    #[test]
    fn test_huge_bit_size_does_not_overflow() {
        let dump = "\
<0><0xb><DW_TAG_compile_unit> DW_AT_name<a.c>
<1><0x2d><DW_TAG_base_type> DW_AT_byte_size<0x4> DW_AT_name<int>
<1><0x30><DW_TAG_structure_type> DW_AT_name<packed> DW_AT_byte_size<0x4>
<2><0x38><DW_TAG_member> DW_AT_name<bad> DW_AT_type<<0x2d>> DW_AT_bit_size<0xffffffffffffffff> DW_AT_bit_offset<1> DW_AT_data_member_location<0>
<2><0x40><DW_TAG_member> DW_AT_name<ok> DW_AT_type<<0x2d>> DW_AT_data_member_location<0>
";
        let types = parse(dump);
        assert_eq!(types["packed"], json!([4, {"ok": [0, ["int"]]}]));
    }

    #[test]
    fn test_noise_is_ignored() {
        let mut parser = DwarfDumpParser::new();
        parser.feed_line("garbage line with no structure");
        parser.feed_line("<x><y><z>");
        assert_eq!(parser.entries_seen(), 0);
        assert_eq!(vtype::extract(&parser.generate_source(), LINUX_TYPES).unwrap(), json!({}));
    }
}
