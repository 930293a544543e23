// Wed Oct 14 2026 - Alex

use super::args::Args;
use crate::archive::{self, ArchiveReader, SingleFile};
use crate::config::Config;
use crate::converter::{self, ConverterKind};
use crate::ui::{print_info, print_success};
use log::error;
use std::path::Path;

pub struct CommandHandler;

impl CommandHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, args: Args) -> anyhow::Result<()> {
        let config = Config::from(&args);
        self.setup_logging(&config)?;
        config.validate().map_err(|e| anyhow::anyhow!(e))?;

        self.handle_convert(&config)
    }

    fn setup_logging(&self, config: &Config) -> anyhow::Result<()> {
        env_logger::Builder::new()
            .filter_level(config.log_filter())
            .format_timestamp(None)
            .init();

        Ok(())
    }

    fn handle_convert(&self, config: &Config) -> anyhow::Result<()> {
        let requested = config.converter_kind()?;

        if !config.quiet {
            print_info(&format!("Reading {}", config.source.display()));
        }

        let mut input = match open_input(requested, &config.source) {
            Ok(input) => input,
            Err(err) => {
                error!("Unable to open {} for reading: {}", config.source.display(), err);
                return Ok(());
            }
        };

        let mut output = match archive::create_writer(&config.destination) {
            Ok(output) => output,
            Err(err) => {
                error!("Unable to open {} for writing: {}", config.destination.display(), err);
                return Ok(());
            }
        };

        let profile_class = config.profile_class.as_deref();
        let kind = match requested {
            Some(kind) => {
                converter::convert_with(kind, input.as_mut(), output.as_mut(), profile_class)?;
                kind
            }
            None => converter::convert_profile(input.as_mut(), output.as_mut(), profile_class)?,
        };
        output.finish()?;

        if !config.quiet {
            print_success(&format!("{} wrote {}", kind, config.destination.display()));
        }
        Ok(())
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Windows inputs are a bare type file, everything else is a container.
fn open_input(kind: Option<ConverterKind>, path: &Path) -> Result<Box<dyn ArchiveReader>, archive::ArchiveError> {
    match kind {
        Some(ConverterKind::Windows) if path.is_file() => Ok(Box::new(SingleFile::open(path)?)),
        _ => archive::open_reader(path),
    }
}
