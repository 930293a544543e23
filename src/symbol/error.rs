// Wed Oct 14 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SymbolError {
    #[error("Unknown architecture marker: {0}")]
    UnknownArchitecture(String),
}
