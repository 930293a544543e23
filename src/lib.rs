// Wed Oct 14 2026 - Alex

pub mod archive;
pub mod config;
pub mod converter;
pub mod dwarf;
pub mod profile;
pub mod symbol;
pub mod ui;
pub mod vtype;

pub use archive::{ArchiveReader, ArchiveWriter};
pub use config::Config;
pub use converter::{convert_profile, convert_with, ConvertError, ConverterKind, ProfileConverter};
pub use symbol::SymbolTable;
