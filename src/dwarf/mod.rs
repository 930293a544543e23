// Wed Oct 14 2026 - Alex

//! Debug-info parsers that produce type layout tables.
//!
//! Both front ends lower their input to [`DebugEntry`] trees and share the
//! [`LayoutBuilder`], so a `.ko` module and its `dwarfdump` text yield the
//! same table.

pub mod builder;
pub mod dump;
pub mod entry;
pub mod error;
pub mod module;

pub use builder::LayoutBuilder;
pub use dump::DwarfDumpParser;
pub use entry::{DebugEntry, EntryAttributes, EntryTag};
pub use error::DwarfError;
pub use module::ModuleParser;
