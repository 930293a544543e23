// Wed Oct 14 2026 - Alex

/// The tags the layout builder cares about. Everything else is `Other` and
/// only kept so its children stay reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryTag {
    CompileUnit,
    Structure,
    Union,
    Member,
    Typedef,
    BaseType,
    Pointer,
    Array,
    Subrange,
    Enumeration,
    Enumerator,
    Const,
    Volatile,
    Subroutine,
    Other,
}

impl EntryTag {
    pub fn from_name(name: &str) -> Self {
        match name {
            "DW_TAG_compile_unit" | "DW_TAG_partial_unit" => EntryTag::CompileUnit,
            "DW_TAG_structure_type" | "DW_TAG_class_type" => EntryTag::Structure,
            "DW_TAG_union_type" => EntryTag::Union,
            "DW_TAG_member" => EntryTag::Member,
            "DW_TAG_typedef" => EntryTag::Typedef,
            "DW_TAG_base_type" => EntryTag::BaseType,
            "DW_TAG_pointer_type" | "DW_TAG_reference_type" => EntryTag::Pointer,
            "DW_TAG_array_type" => EntryTag::Array,
            "DW_TAG_subrange_type" => EntryTag::Subrange,
            "DW_TAG_enumeration_type" => EntryTag::Enumeration,
            "DW_TAG_enumerator" => EntryTag::Enumerator,
            "DW_TAG_const_type" => EntryTag::Const,
            "DW_TAG_volatile_type" | "DW_TAG_restrict_type" => EntryTag::Volatile,
            "DW_TAG_subroutine_type" => EntryTag::Subroutine,
            _ => EntryTag::Other,
        }
    }

    pub fn is_aggregate(self) -> bool {
        matches!(self, EntryTag::Structure | EntryTag::Union)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryAttributes {
    pub name: Option<String>,
    pub byte_size: Option<u64>,
    pub type_ref: Option<u64>,
    pub member_location: Option<u64>,
    pub bit_size: Option<u64>,
    pub bit_offset: Option<u64>,
    pub data_bit_offset: Option<u64>,
    pub upper_bound: Option<u64>,
    pub count: Option<u64>,
    pub const_value: Option<i64>,
    pub declaration: bool,
}

/// One debug information entry, offsets relative to its compile unit.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugEntry {
    pub offset: u64,
    pub tag: EntryTag,
    pub attrs: EntryAttributes,
    pub children: Vec<DebugEntry>,
}

impl DebugEntry {
    pub fn new(offset: u64, tag: EntryTag) -> Self {
        Self {
            offset,
            tag,
            attrs: EntryAttributes::default(),
            children: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.attrs.name = Some(name.to_string());
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.attrs.byte_size = Some(size);
        self
    }

    pub fn with_type(mut self, type_ref: u64) -> Self {
        self.attrs.type_ref = Some(type_ref);
        self
    }

    pub fn with_location(mut self, location: u64) -> Self {
        self.attrs.member_location = Some(location);
        self
    }

    pub fn with_child(mut self, child: DebugEntry) -> Self {
        self.children.push(child);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.attrs.name.as_deref()
    }
}
