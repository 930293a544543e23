// Wed Oct 14 2026 - Alex

use super::entry::{DebugEntry, EntryTag};
use serde_json::{json, Map, Value};
use std::collections::HashMap;

const MAX_TYPE_DEPTH: usize = 32;

/// Turns DIE trees into a vtype table:
/// `{ name: [size, { member: [offset, [target, {args}]] }] }`.
pub struct LayoutBuilder {
    types: Map<String, Value>,
    units: usize,
}

impl LayoutBuilder {
    pub fn new() -> Self {
        Self {
            types: Map::new(),
            units: 0,
        }
    }

    pub fn add_unit(&mut self, unit: &DebugEntry) {
        let mut index = HashMap::new();
        index_entries(unit, &mut index);

        let resolver = UnitResolver { index, unit: self.units };
        self.units += 1;

        let mut aggregates = Vec::new();
        collect_aggregates(unit, &mut aggregates);

        for entry in aggregates {
            if entry.attrs.declaration {
                continue;
            }
            let Some(size) = entry.attrs.byte_size else {
                continue;
            };

            let name = resolver.aggregate_name(entry);
            if self.types.contains_key(&name) {
                continue;
            }

            let members = resolver.members(entry);
            self.types.insert(name, json!([size, members]));
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn type_table(self) -> Value {
        Value::Object(self.types)
    }
}

impl Default for LayoutBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn index_entries<'a>(entry: &'a DebugEntry, index: &mut HashMap<u64, &'a DebugEntry>) {
    index.insert(entry.offset, entry);
    for child in &entry.children {
        index_entries(child, index);
    }
}

fn collect_aggregates<'a>(entry: &'a DebugEntry, out: &mut Vec<&'a DebugEntry>) {
    if entry.tag.is_aggregate() {
        out.push(entry);
    }
    for child in &entry.children {
        collect_aggregates(child, out);
    }
}

struct UnitResolver<'a> {
    index: HashMap<u64, &'a DebugEntry>,
    unit: usize,
}

impl<'a> UnitResolver<'a> {
    fn aggregate_name(&self, entry: &DebugEntry) -> String {
        match entry.name() {
            Some(name) => name.to_string(),
            None => self.anonymous_name(entry.offset),
        }
    }

    fn anonymous_name(&self, offset: u64) -> String {
        if self.unit == 0 {
            format!("__unnamed_0x{:x}", offset)
        } else {
            format!("__unnamed_{}_0x{:x}", self.unit, offset)
        }
    }

    fn members(&self, aggregate: &DebugEntry) -> Map<String, Value> {
        let mut members = Map::new();

        for child in aggregate.children.iter().filter(|c| c.tag == EntryTag::Member) {
            let name = match child.name() {
                Some(name) => name.to_string(),
                None => self.anonymous_name(child.offset),
            };

            let (offset, target) = match child.attrs.bit_size {
                Some(bit_size) => match self.bitfield(child, bit_size) {
                    Some(bitfield) => bitfield,
                    None => continue,
                },
                None => (child.attrs.member_location.unwrap_or(0), self.target(child.attrs.type_ref, 0)),
            };

            members.insert(name, json!([offset, target]));
        }

        members
    }

    /// Bit positions that do not fit in 64 bits mean the entry is corrupt;
    /// such members are left out.
    fn bitfield(&self, member: &DebugEntry, bit_size: u64) -> Option<(u64, Vec<Value>)> {
        let storage = member.attrs.byte_size
            .or_else(|| self.size_of(member.attrs.type_ref, 0))
            .unwrap_or(4)
            .max(1);
        let storage_bits = storage.checked_mul(8)?;

        let (offset, start_bit) = match (member.attrs.data_bit_offset, member.attrs.bit_offset) {
            (Some(data_bit_offset), _) => {
                let offset = match member.attrs.member_location {
                    Some(location) => location,
                    None => (data_bit_offset / storage_bits).checked_mul(storage)?,
                };
                (offset, data_bit_offset.saturating_sub(offset.checked_mul(8)?))
            }
            // DWARF 2/3 count from the most significant bit of the storage unit.
            (None, Some(bit_offset)) => (
                member.attrs.member_location.unwrap_or(0),
                storage_bits.saturating_sub(bit_offset.checked_add(bit_size)?),
            ),
            (None, None) => (member.attrs.member_location.unwrap_or(0), 0),
        };
        let end_bit = start_bit.checked_add(bit_size)?;

        let base = self.target(member.attrs.type_ref, 0);
        let target = base.first().cloned().unwrap_or_else(|| json!("void"));

        Some((offset, vec![
            json!("BitField"),
            json!({
                "start_bit": start_bit,
                "end_bit": end_bit,
                "target": target,
            }),
        ]))
    }

    fn target(&self, type_ref: Option<u64>, depth: usize) -> Vec<Value> {
        let Some(entry) = self.lookup(type_ref, depth) else {
            return vec![json!("void")];
        };

        match entry.tag {
            EntryTag::BaseType => vec![json!(base_type_name(entry.name().unwrap_or("void")))],
            EntryTag::Structure | EntryTag::Union => vec![json!(self.aggregate_name(entry))],
            EntryTag::Typedef | EntryTag::Const | EntryTag::Volatile => {
                self.target(entry.attrs.type_ref, depth + 1)
            }
            EntryTag::Pointer => {
                let inner = self.target(entry.attrs.type_ref, depth + 1);
                vec![json!("Pointer"), Value::Object(target_args(inner))]
            }
            EntryTag::Array => self.array(entry, depth),
            EntryTag::Enumeration => vec![json!("Enumeration"), self.enumeration(entry)],
            _ => vec![json!("void")],
        }
    }

    fn array(&self, entry: &DebugEntry, depth: usize) -> Vec<Value> {
        let mut counts: Vec<u64> = entry.children.iter()
            .filter(|c| c.tag == EntryTag::Subrange)
            .map(subrange_count)
            .collect();
        if counts.is_empty() {
            counts.push(0);
        }

        let mut target = self.target(entry.attrs.type_ref, depth + 1);
        for count in counts.into_iter().rev() {
            let mut args = target_args(target);
            args.insert("count".to_string(), json!(count));
            target = vec![json!("Array"), Value::Object(args)];
        }
        target
    }

    fn enumeration(&self, entry: &DebugEntry) -> Value {
        let mut choices = Map::new();
        for child in entry.children.iter().filter(|c| c.tag == EntryTag::Enumerator) {
            if let (Some(name), Some(value)) = (child.name(), child.attrs.const_value) {
                choices.insert(value.to_string(), json!(name));
            }
        }

        let target = match entry.attrs.byte_size {
            Some(1) => "unsigned char",
            Some(2) => "unsigned short",
            Some(8) => "long long",
            _ => "int",
        };

        json!({ "choices": choices, "target": target })
    }

    fn size_of(&self, type_ref: Option<u64>, depth: usize) -> Option<u64> {
        let entry = self.lookup(type_ref, depth)?;
        match entry.attrs.byte_size {
            Some(size) => Some(size),
            None if matches!(entry.tag, EntryTag::Typedef | EntryTag::Const | EntryTag::Volatile) => {
                self.size_of(entry.attrs.type_ref, depth + 1)
            }
            None => None,
        }
    }

    fn lookup(&self, type_ref: Option<u64>, depth: usize) -> Option<&'a DebugEntry> {
        if depth > MAX_TYPE_DEPTH {
            return None;
        }
        self.index.get(&type_ref?).copied()
    }
}

fn subrange_count(subrange: &DebugEntry) -> u64 {
    if let Some(count) = subrange.attrs.count {
        return count;
    }
    match subrange.attrs.upper_bound {
        // Flexible array members carry an all-ones bound.
        Some(bound) if bound == u64::MAX || bound == u64::from(u32::MAX) => 0,
        Some(bound) => bound + 1,
        None => 0,
    }
}

fn target_args(mut target: Vec<Value>) -> Map<String, Value> {
    let mut args = Map::new();
    let args_value = if target.len() > 1 { target.pop() } else { None };
    let name = target.into_iter().next().unwrap_or_else(|| json!("void"));

    args.insert("target".to_string(), name);
    if let Some(value) = args_value {
        args.insert("target_args".to_string(), value);
    }
    args
}

/// Maps compiler base type names onto the names profile consumers use.
pub fn base_type_name(name: &str) -> &str {
    match name {
        "_Bool" => "unsigned char",
        "long int" => "long",
        "long long int" => "long long",
        "long unsigned int" => "unsigned long",
        "long long unsigned int" => "unsigned long long",
        "short int" => "short",
        "short unsigned int" => "unsigned short",
        "long double" => "double",
        "sizetype" => "unsigned long",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(offset: u64, name: &str, size: u64) -> DebugEntry {
        DebugEntry::new(offset, EntryTag::BaseType).with_name(name).with_size(size)
    }

    fn member(offset: u64, name: &str, type_ref: u64, location: u64) -> DebugEntry {
        DebugEntry::new(offset, EntryTag::Member).with_name(name).with_type(type_ref).with_location(location)
    }

    fn sample_unit() -> DebugEntry {
        let list_head = DebugEntry::new(0x40, EntryTag::Structure)
            .with_name("list_head")
            .with_size(16)
            .with_child(member(0x41, "next", 0x50, 0))
            .with_child(member(0x42, "prev", 0x50, 8));

        let comm = DebugEntry::new(0x70, EntryTag::Array)
            .with_type(0x11)
            .with_child({
                let mut range = DebugEntry::new(0x71, EntryTag::Subrange);
                range.attrs.upper_bound = Some(15);
                range
            });

        let mut flags = member(0x83, "flags", 0x10, 24);
        flags.attrs.bit_size = Some(3);
        flags.attrs.bit_offset = Some(29);

        let task = DebugEntry::new(0x80, EntryTag::Structure)
            .with_name("task_struct")
            .with_size(32)
            .with_child(member(0x81, "pid", 0x60, 0))
            .with_child(member(0x82, "comm", 0x70, 4))
            .with_child(flags);

        let mut forward = DebugEntry::new(0x90, EntryTag::Structure).with_name("mm_struct");
        forward.attrs.declaration = true;

        DebugEntry::new(0, EntryTag::CompileUnit)
            .with_child(base(0x10, "unsigned int", 4))
            .with_child(base(0x11, "char", 1))
            .with_child(base(0x12, "int", 4))
            .with_child(list_head)
            .with_child(DebugEntry::new(0x50, EntryTag::Pointer).with_type(0x40))
            .with_child(DebugEntry::new(0x60, EntryTag::Typedef).with_name("pid_t").with_type(0x12))
            .with_child(comm)
            .with_child(task)
            .with_child(forward)
    }

    #[test]
    fn test_builds_vtypes() {
        let mut builder = LayoutBuilder::new();
        builder.add_unit(&sample_unit());
        assert_eq!(builder.len(), 2);

        let types = builder.type_table();
        assert_eq!(types["list_head"], json!([16, {
            "next": [0, ["Pointer", {"target": "list_head"}]],
            "prev": [8, ["Pointer", {"target": "list_head"}]],
        }]));

        let task = &types["task_struct"];
        assert_eq!(task[0], json!(32));
        assert_eq!(task[1]["pid"], json!([0, ["int"]]));
        assert_eq!(task[1]["comm"], json!([4, ["Array", {"count": 16, "target": "char"}]]));
        assert_eq!(task[1]["flags"], json!([24, ["BitField", {"start_bit": 0, "end_bit": 3, "target": "unsigned int"}]]));
        assert!(types.get("mm_struct").is_none());
    }

    #[test]
    fn test_anonymous_and_enum() {
        let mut union = DebugEntry::new(0x20, EntryTag::Union).with_size(8);
        union.children.push(member(0x21, "raw", 0x10, 0));

        let mut state = DebugEntry::new(0x30, EntryTag::Enumeration).with_size(4);
        for (i, name) in ["RUNNING", "SLEEPING"].iter().enumerate() {
            let mut e = DebugEntry::new(0x31 + i as u64, EntryTag::Enumerator).with_name(name);
            e.attrs.const_value = Some(i as i64);
            state.children.push(e);
        }

        let holder = DebugEntry::new(0x40, EntryTag::Structure)
            .with_name("holder")
            .with_size(16)
            .with_child(DebugEntry::new(0x41, EntryTag::Member).with_type(0x20))
            .with_child(member(0x42, "state", 0x30, 8));

        let unit = DebugEntry::new(0, EntryTag::CompileUnit)
            .with_child(base(0x10, "long unsigned int", 8))
            .with_child(union)
            .with_child(state)
            .with_child(holder);

        let mut builder = LayoutBuilder::new();
        builder.add_unit(&unit);
        let types = builder.type_table();

        assert_eq!(types["__unnamed_0x20"], json!([8, {"raw": [0, ["unsigned long"]]}]));
        assert_eq!(types["holder"][1]["__unnamed_0x41"], json!([0, ["__unnamed_0x20"]]));
        assert_eq!(types["holder"][1]["state"], json!([8, ["Enumeration", {
            "choices": {"0": "RUNNING", "1": "SLEEPING"},
            "target": "int",
        }]]));
    }

    #[test]
    fn test_oversized_bitfield_is_dropped() {
        let mut broken = member(0x21, "broken", 0x10, 0);
        broken.attrs.bit_size = Some(u64::MAX);
        broken.attrs.bit_offset = Some(1);

        let mut flag = member(0x22, "flag", 0x10, 0);
        flag.attrs.bit_size = Some(1);
        flag.attrs.bit_offset = Some(31);

        let unit = DebugEntry::new(0, EntryTag::CompileUnit)
            .with_child(base(0x10, "unsigned int", 4))
            .with_child(DebugEntry::new(0x20, EntryTag::Structure).with_name("flags").with_size(4)
                .with_child(broken)
                .with_child(flag));

        let mut builder = LayoutBuilder::new();
        builder.add_unit(&unit);
        let types = builder.type_table();
        assert!(types["flags"][1].get("broken").is_none());
        assert_eq!(types["flags"][1]["flag"], json!([0, ["BitField", {
            "start_bit": 0,
            "end_bit": 1,
            "target": "unsigned int",
        }]]));
    }

    #[test]
    fn test_cyclic_typedef_resolves_to_void() {
        let unit = DebugEntry::new(0, EntryTag::CompileUnit)
            .with_child(DebugEntry::new(0x10, EntryTag::Typedef).with_name("a").with_type(0x11))
            .with_child(DebugEntry::new(0x11, EntryTag::Typedef).with_name("b").with_type(0x10))
            .with_child(DebugEntry::new(0x20, EntryTag::Structure).with_name("s").with_size(4)
                .with_child(member(0x21, "x", 0x10, 0)));

        let mut builder = LayoutBuilder::new();
        builder.add_unit(&unit);
        assert_eq!(builder.type_table()["s"][1]["x"], json!([0, ["void"]]));
    }
}
