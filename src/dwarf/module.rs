// Wed Oct 14 2026 - Alex

use super::builder::LayoutBuilder;
use super::entry::{DebugEntry, EntryAttributes, EntryTag};
use super::DwarfError;
use gimli::{constants, AttributeValue, EndianSlice, EntriesTreeNode, Reader, RunTimeEndian, Unit};
use goblin::elf::header::{EM_386, EM_X86_64, ET_REL};
use goblin::elf::Elf;
use log::debug;
use serde_json::Value;
use std::collections::HashMap;

type Slice<'a> = EndianSlice<'a, RunTimeEndian>;

const R_X86_64_64: u32 = 1;
const R_X86_64_32: u32 = 10;
const R_X86_64_32S: u32 = 11;
const R_386_32: u32 = 1;

/// Reads the type layouts out of a compiled kernel module's debug sections.
pub struct ModuleParser {
    sections: HashMap<String, Vec<u8>>,
    endian: RunTimeEndian,
}

impl ModuleParser {
    pub fn new(data: &[u8]) -> Result<Self, DwarfError> {
        let elf = Elf::parse(data)?;
        let endian = if elf.little_endian { RunTimeEndian::Little } else { RunTimeEndian::Big };

        let mut sections = HashMap::new();
        let mut by_index = HashMap::new();
        for (index, header) in elf.section_headers.iter().enumerate() {
            let Some(name) = elf.shdr_strtab.get_at(header.sh_name) else {
                continue;
            };
            if !name.starts_with(".debug_") {
                continue;
            }
            let Some(range) = header.file_range() else {
                continue;
            };
            let bytes = data.get(range)
                .ok_or_else(|| DwarfError::MissingSection(name.to_string()))?;
            sections.insert(name.to_string(), bytes.to_vec());
            by_index.insert(index, name.to_string());
        }

        if !sections.contains_key(".debug_info") {
            return Err(DwarfError::MissingSection(".debug_info".to_string()));
        }

        let mut parser = Self { sections, endian };
        if elf.header.e_type == ET_REL {
            parser.apply_relocations(&elf, &by_index)?;
        }
        Ok(parser)
    }

    /// Relocatable objects leave string and cross-section offsets in their
    /// debug sections unresolved until link time; patch them in place.
    fn apply_relocations(&mut self, elf: &Elf, by_index: &HashMap<usize, String>) -> Result<(), DwarfError> {
        let machine = elf.header.e_machine;
        let endian = self.endian;

        for (reloc_index, relocs) in &elf.shdr_relocs {
            let Some(reloc_header) = elf.section_headers.get(*reloc_index) else {
                continue;
            };
            let Some(target_name) = by_index.get(&(reloc_header.sh_info as usize)) else {
                continue;
            };
            let Some(target) = self.sections.get_mut(target_name) else {
                continue;
            };

            let mut applied = 0usize;
            for reloc in relocs.iter() {
                let width = match (machine, reloc.r_type) {
                    (EM_X86_64, R_X86_64_64) => 8,
                    (EM_X86_64, R_X86_64_32) | (EM_X86_64, R_X86_64_32S) => 4,
                    (EM_386, R_386_32) => 4,
                    _ => continue,
                };

                let offset = reloc.r_offset as usize;
                let Some(slot) = offset.checked_add(width).and_then(|end| target.get_mut(offset..end)) else {
                    return Err(DwarfError::Relocation(format!(
                        "offset 0x{:x} outside {}", offset, target_name
                    )));
                };

                let symbol = elf.syms.get(reloc.r_sym).map(|s| s.st_value).unwrap_or(0);
                let addend = match reloc.r_addend {
                    Some(addend) => addend,
                    None => read_word(slot, endian) as i64,
                };
                write_word(slot, symbol.wrapping_add(addend as u64), endian);
                applied += 1;
            }

            debug!("Applied {} relocations to {}", applied, target_name);
        }

        Ok(())
    }

    fn section(&self, id: gimli::SectionId) -> Slice<'_> {
        let data = self.sections.get(id.name()).map(Vec::as_slice).unwrap_or(&[]);
        EndianSlice::new(data, self.endian)
    }

    /// Builds the vtype table from every unit in `.debug_info`.
    pub fn type_table(&self) -> Result<Value, DwarfError> {
        let dwarf = gimli::Dwarf::load(|id| Ok::<_, gimli::Error>(self.section(id)))?;

        let mut builder = LayoutBuilder::new();
        let mut headers = dwarf.units();
        while let Some(header) = headers.next()? {
            let unit = dwarf.unit(header)?;
            let mut tree = unit.entries_tree(None)?;
            let root = convert_node(&dwarf, &unit, tree.root()?)?;
            builder.add_unit(&root);
        }

        debug!("Extracted {} types from module", builder.len());
        Ok(builder.type_table())
    }
}

fn convert_node<'a>(
    dwarf: &gimli::Dwarf<Slice<'a>>,
    unit: &Unit<Slice<'a>>,
    node: EntriesTreeNode<'_, '_, '_, Slice<'a>>,
) -> Result<DebugEntry, gimli::Error> {
    let die = node.entry();
    let tag = die.tag().static_string().map(EntryTag::from_name).unwrap_or(EntryTag::Other);
    let mut entry = DebugEntry::new(die.offset().0 as u64, tag);

    let mut attrs = die.attrs();
    while let Some(attr) = attrs.next()? {
        read_attribute(dwarf, unit, &mut entry.attrs, attr.name(), attr.value())?;
    }

    let mut children = node.children();
    while let Some(child) = children.next()? {
        entry.children.push(convert_node(dwarf, unit, child)?);
    }

    Ok(entry)
}

fn read_attribute<'a>(
    dwarf: &gimli::Dwarf<Slice<'a>>,
    unit: &Unit<Slice<'a>>,
    attrs: &mut EntryAttributes,
    name: constants::DwAt,
    value: AttributeValue<Slice<'a>>,
) -> Result<(), gimli::Error> {
    match name {
        constants::DW_AT_name => {
            if let Ok(s) = dwarf.attr_string(unit, value) {
                attrs.name = Some(s.to_string_lossy().into_owned());
            }
        }
        constants::DW_AT_type => {
            attrs.type_ref = match value {
                AttributeValue::UnitRef(offset) => Some(offset.0 as u64),
                AttributeValue::DebugInfoRef(offset) => {
                    offset.to_unit_offset(&unit.header).map(|o| o.0 as u64)
                }
                _ => None,
            };
        }
        constants::DW_AT_data_member_location => {
            attrs.member_location = match value {
                AttributeValue::Exprloc(expr) => plus_uconst(expr.0)?,
                other => other.udata_value(),
            };
        }
        constants::DW_AT_byte_size => attrs.byte_size = value.udata_value(),
        constants::DW_AT_bit_size => attrs.bit_size = value.udata_value(),
        constants::DW_AT_bit_offset => attrs.bit_offset = value.udata_value(),
        constants::DW_AT_data_bit_offset => attrs.data_bit_offset = value.udata_value(),
        constants::DW_AT_upper_bound => attrs.upper_bound = value.udata_value(),
        constants::DW_AT_count => attrs.count = value.udata_value(),
        constants::DW_AT_const_value => {
            attrs.const_value = match value {
                AttributeValue::Sdata(v) => Some(v),
                other => other.udata_value().map(|v| v as i64),
            };
        }
        constants::DW_AT_declaration => attrs.declaration = matches!(value, AttributeValue::Flag(true)),
        _ => {}
    }
    Ok(())
}

/// Member locations written as an expression are almost always a single
/// `DW_OP_plus_uconst`; anything more involved is left unresolved.
fn plus_uconst(mut expr: Slice<'_>) -> Result<Option<u64>, gimli::Error> {
    if expr.is_empty() {
        return Ok(None);
    }
    let op = expr.read_u8()?;
    if op != constants::DW_OP_plus_uconst.0 {
        return Ok(None);
    }
    Ok(Some(expr.read_uleb128()?))
}

fn read_word(slot: &[u8], endian: RunTimeEndian) -> u64 {
    let mut value = 0u64;
    match endian {
        RunTimeEndian::Little => {
            for (i, byte) in slot.iter().enumerate() {
                value |= u64::from(*byte) << (8 * i);
            }
        }
        RunTimeEndian::Big => {
            for byte in slot {
                value = (value << 8) | u64::from(*byte);
            }
        }
    }
    value
}

fn write_word(slot: &mut [u8], value: u64, endian: RunTimeEndian) {
    let width = slot.len();
    for (i, byte) in slot.iter_mut().enumerate() {
        let shift = match endian {
            RunTimeEndian::Little => 8 * i,
            RunTimeEndian::Big => 8 * (width - 1 - i),
        };
        *byte = (value >> shift) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_elf() {
        assert!(matches!(ModuleParser::new(b"not an elf file at all"), Err(DwarfError::Elf(_))));
    }

    #[test]
    fn test_word_roundtrip() {
        let mut slot = [0u8; 4];
        write_word(&mut slot, 0x1122_3344, RunTimeEndian::Little);
        assert_eq!(slot, [0x44, 0x33, 0x22, 0x11]);
        assert_eq!(read_word(&slot, RunTimeEndian::Little), 0x1122_3344);

        write_word(&mut slot, 0x1122_3344, RunTimeEndian::Big);
        assert_eq!(slot, [0x11, 0x22, 0x33, 0x44]);
        assert_eq!(read_word(&slot, RunTimeEndian::Big), 0x1122_3344);
    }

    #[test]
    fn test_plus_uconst() {
        let expr = EndianSlice::new(&[0x23, 0x98, 0x01], RunTimeEndian::Little);
        assert_eq!(plus_uconst(expr).unwrap(), Some(152));

        let other = EndianSlice::new(&[0x10, 0x01], RunTimeEndian::Little);
        assert_eq!(plus_uconst(other).unwrap(), None);
    }
}
