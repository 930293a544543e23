// Wed Oct 14 2026 - Alex

use crate::archive::ArchiveError;
use crate::dwarf::DwarfError;
use crate::symbol::SymbolError;
use crate::vtype::VTypeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Unknown profile format")]
    FormatNotRecognized,
    #[error("Profile class could not be determined, specify it explicitly")]
    UnresolvedArchitecture,
    #[error("Unknown Darwin architecture {0}")]
    UnknownArchitecture(String),
    #[error("Profile class implementation not provided")]
    ProfileClassRequired,
    #[error("No suitable converter found - profile not recognized")]
    NoSuitableConverter,
    #[error("Unknown converter {0}")]
    UnknownConverter(String),
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),
    #[error("Type description error: {0}")]
    VType(#[from] VTypeError),
    #[error("Debug info error: {0}")]
    Dwarf(#[from] DwarfError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConvertError {
    /// True when the input simply is not this converter's format, as opposed
    /// to being the right format but unusable.
    pub fn is_format_not_recognized(&self) -> bool {
        matches!(self, ConvertError::FormatNotRecognized)
    }
}

impl From<SymbolError> for ConvertError {
    fn from(err: SymbolError) -> Self {
        match err {
            SymbolError::UnknownArchitecture(marker) => ConvertError::UnknownArchitecture(marker),
        }
    }
}
