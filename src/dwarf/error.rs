// Wed Oct 14 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DwarfError {
    #[error("ELF parse error: {0}")]
    Elf(#[from] goblin::error::Error),
    #[error("DWARF error: {0}")]
    Gimli(#[from] gimli::Error),
    #[error("Relocation error: {0}")]
    Relocation(String),
    #[error("Missing debug section: {0}")]
    MissingSection(String),
}
