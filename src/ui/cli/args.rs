// Wed Oct 14 2026 - Alex

use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "profile-converter")]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Converts legacy memory-analysis profiles into the JSON profile layout", long_about = None)]
pub struct Args {
    /// Input profile: a zip archive, a directory, or a Windows type file.
    pub source: PathBuf,

    /// Output profile: a zip file to create, or an existing directory.
    pub destination: PathBuf,

    #[arg(long = "profile_class")]
    pub profile_class: Option<String>,

    #[arg(long)]
    pub converter: Option<String>,

    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    #[arg(short, long)]
    pub quiet: bool,
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        let mut config = Config::new(args.source.clone(), args.destination.clone())
            .with_log_level(args.log_level.clone())
            .with_quiet(args.quiet);
        if let Some(profile_class) = &args.profile_class {
            config = config.with_profile_class(profile_class.clone());
        }
        if let Some(converter) = &args.converter {
            config = config.with_converter(converter.clone());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "profile-converter",
            "--profile_class",
            "Win7SP1x64",
            "--converter",
            "windows",
            "ntkrnlmp.py",
            "Win7SP1x64.zip",
        ])
        .unwrap();

        let config = Config::from(&args);
        assert_eq!(config.source, PathBuf::from("ntkrnlmp.py"));
        assert_eq!(config.destination, PathBuf::from("Win7SP1x64.zip"));
        assert_eq!(config.profile_class.as_deref(), Some("Win7SP1x64"));
        assert_eq!(config.converter.as_deref(), Some("windows"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_requires_both_paths() {
        assert!(Args::try_parse_from(["profile-converter", "only-source.zip"]).is_err());
    }
}
