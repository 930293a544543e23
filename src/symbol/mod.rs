// Wed Oct 14 2026 - Alex

pub mod dsymutil;
pub mod error;
pub mod system_map;
pub mod table;

pub use dsymutil::{parse_dsymutil, Bitness, DsymutilDump};
pub use error::SymbolError;
pub use system_map::parse_system_map;
pub use table::SymbolTable;
