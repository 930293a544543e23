// Wed Oct 14 2026 - Alex

use crate::converter::{ConvertError, ConverterKind};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub profile_class: Option<String>,
    pub converter: Option<String>,
    pub log_level: String,
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            destination: PathBuf::new(),
            profile_class: None,
            converter: None,
            log_level: "info".to_string(),
            quiet: false,
        }
    }
}

impl Config {
    pub fn new(source: PathBuf, destination: PathBuf) -> Self {
        Self {
            source,
            destination,
            ..Self::default()
        }
    }

    pub fn with_profile_class(mut self, profile_class: String) -> Self {
        self.profile_class = Some(profile_class);
        self
    }

    pub fn with_converter(mut self, converter: String) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn with_log_level(mut self, log_level: String) -> Self {
        self.log_level = log_level;
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// The explicitly requested converter, if any.
    pub fn converter_kind(&self) -> Result<Option<ConverterKind>, ConvertError> {
        self.converter.as_deref().map(ConverterKind::from_name).transpose()
    }

    pub fn log_filter(&self) -> LevelFilter {
        match self.log_level.to_lowercase().as_str() {
            "off" => LevelFilter::Off,
            "error" => LevelFilter::Error,
            "warn" | "warning" => LevelFilter::Warn,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            _ => LevelFilter::Info,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.source.as_os_str().is_empty() {
            return Err("source must be set".to_string());
        }
        if self.destination.as_os_str().is_empty() {
            return Err("destination must be set".to_string());
        }
        if self.source == self.destination {
            return Err("source and destination must differ".to_string());
        }
        let level = self.log_level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) && level != "warning" {
            return Err(format!("unknown log level {}", self.log_level));
        }
        if let Some(profile_class) = &self.profile_class {
            if profile_class.trim().is_empty() {
                return Err("profile_class must not be empty".to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::new(PathBuf::from("Ubuntu.zip"), PathBuf::from("Ubuntu.profile"))
    }

    #[test]
    fn test_validate() {
        assert!(config().validate().is_ok());
        assert!(Config::new(PathBuf::new(), PathBuf::from("out")).validate().is_err());
        assert!(Config::new(PathBuf::from("same"), PathBuf::from("same")).validate().is_err());
        assert!(config().with_log_level("loud".to_string()).validate().is_err());
        assert!(config().with_profile_class("  ".to_string()).validate().is_err());
    }

    #[test]
    fn test_converter_kind() {
        assert_eq!(config().converter_kind().unwrap(), None);
        assert_eq!(
            config().with_converter("Windows".to_string()).converter_kind().unwrap(),
            Some(ConverterKind::Windows)
        );
        assert!(config().with_converter("bsd".to_string()).converter_kind().is_err());
    }

    #[test]
    fn test_log_filter() {
        assert_eq!(config().log_filter(), LevelFilter::Info);
        assert_eq!(config().with_log_level("DEBUG".to_string()).log_filter(), LevelFilter::Debug);
        assert_eq!(config().with_log_level("warning".to_string()).log_filter(), LevelFilter::Warn);
    }
}
