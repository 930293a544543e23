// Wed Oct 14 2026 - Alex

//! Turning legacy profile inputs into the consolidated profile layout.
//!
//! Every variant gets the same input and output archive and either produces
//! a profile, reports that the input is not its format, or fails outright.
//! Autodetection walks the variants in a fixed order and only moves on for
//! the "not my format" case.

pub mod common;
pub mod darwin;
pub mod error;
pub mod linux;
pub mod windows;

pub use common::ConverterContext;
pub use darwin::DarwinConverter;
pub use error::ConvertError;
pub use linux::LinuxConverter;
pub use windows::WindowsConverter;

use crate::archive::{ArchiveReader, ArchiveWriter};
use crate::symbol::SymbolTable;
use log::{debug, info};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub trait ProfileConverter {
    /// Inspects the input and, if it is recognized, writes the profile.
    fn convert(&mut self) -> Result<(), ConvertError>;

    /// Resolves the profile class if still unknown, then emits the profile.
    fn write_profile(&mut self, symbols: SymbolTable, vtypes: Value) -> Result<(), ConvertError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConverterKind {
    Linux,
    Darwin,
    Windows,
}

impl ConverterKind {
    /// Variants tried, in order, when none is named.
    pub const AUTODETECT: [ConverterKind; 2] = [ConverterKind::Linux, ConverterKind::Darwin];

    pub const ALL: [ConverterKind; 3] = [ConverterKind::Linux, ConverterKind::Darwin, ConverterKind::Windows];

    pub fn from_name(name: &str) -> Result<Self, ConvertError> {
        match name.to_ascii_lowercase().as_str() {
            "linux" | "linuxconverter" => Ok(ConverterKind::Linux),
            "darwin" | "osx" | "osxconverter" => Ok(ConverterKind::Darwin),
            "windows" | "windowsconverter" => Ok(ConverterKind::Windows),
            _ => Err(ConvertError::UnknownConverter(name.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ConverterKind::Linux => "LinuxConverter",
            ConverterKind::Darwin => "OSXConverter",
            ConverterKind::Windows => "WindowsConverter",
        }
    }

    pub fn build<'a>(
        self,
        input: &'a mut dyn ArchiveReader,
        output: &'a mut dyn ArchiveWriter,
        profile_class: Option<&str>,
    ) -> Box<dyn ProfileConverter + 'a> {
        let ctx = ConverterContext::new(input, output, profile_class.map(str::to_string));
        match self {
            ConverterKind::Linux => Box::new(LinuxConverter::new(ctx)),
            ConverterKind::Darwin => Box::new(DarwinConverter::new(ctx)),
            ConverterKind::Windows => Box::new(WindowsConverter::new(ctx)),
        }
    }
}

impl fmt::Display for ConverterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConverterKind {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Runs one named converter against the input.
pub fn convert_with(
    kind: ConverterKind,
    input: &mut dyn ArchiveReader,
    output: &mut dyn ArchiveWriter,
    profile_class: Option<&str>,
) -> Result<(), ConvertError> {
    kind.build(input, output, profile_class).convert()?;
    info!("Converted {} profile", kind);
    Ok(())
}

/// Tries each autodetected converter in turn and returns the one that
/// produced the profile.
pub fn convert_profile(
    input: &mut dyn ArchiveReader,
    output: &mut dyn ArchiveWriter,
    profile_class: Option<&str>,
) -> Result<ConverterKind, ConvertError> {
    for kind in ConverterKind::AUTODETECT {
        let mut converter = kind.build(&mut *input, &mut *output, profile_class);
        match converter.convert() {
            Ok(()) => {
                info!("Converted {} profile", kind);
                return Ok(kind);
            }
            Err(ConvertError::FormatNotRecognized) => {
                debug!("{} did not recognize the input", kind);
            }
            Err(err) => return Err(err),
        }
    }

    Err(ConvertError::NoSuitableConverter)
}
