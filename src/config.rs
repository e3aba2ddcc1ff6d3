//! Configuration file support for the debug logger

use crate::error::Result;
use crate::logger::{DebugLogger, Destination, Flags, Options};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Debug logger configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DebugConfig {
    /// Turn debug records on
    #[serde(default)]
    pub enabled: bool,

    /// Metadata fields; omitted selects the default set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<Flags>,

    /// Always write to standard output as well
    #[serde(default)]
    pub verbose: bool,

    /// Files records are appended to
    #[serde(default)]
    pub files: Vec<PathBuf>,
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

impl DebugConfig {
    /// Load configuration from a JSON file, or TOML for `.toml` paths
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = if is_toml(path) {
            toml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };
        Ok(config)
    }

    /// Save configuration to a file, format chosen by extension
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = if is_toml(path) {
            toml::to_string_pretty(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = self.files.iter().find(|p| p.as_os_str().is_empty()) {
            return Err(format!("empty log file path: {:?}", path).into());
        }

        let flags = self.flags();
        if flags.contains(Flags::LONG_FILE) && flags.contains(Flags::SHORT_FILE) {
            tracing::warn!("Both longfile and shortfile set, shortfile wins");
        }
        if self.enabled && self.files.is_empty() && !self.verbose {
            tracing::debug!("No log files configured, records go to stdout");
        }

        Ok(())
    }

    /// Effective flags
    pub fn flags(&self) -> Flags {
        self.options().flags.unwrap_or(Flags::DEFAULT)
    }

    /// Options to enable the logger with
    pub fn options(&self) -> Options {
        Options {
            flags: self.flags,
            verbose: self.verbose,
        }
    }

    /// Open every configured file for appending, creating it if missing
    pub fn open_destinations(&self) -> Result<Vec<Destination>> {
        self.files
            .iter()
            .map(|path| {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                Ok(Destination::writer(file))
            })
            .collect()
    }
}

impl DebugLogger {
    /// Validate `config`, open its files and reconfigure accordingly.
    ///
    /// Files are only opened when enabling.
    pub fn apply_config(&self, config: &DebugConfig) -> Result<()> {
        config.validate()?;
        let destinations = if config.enabled {
            config.open_destinations()?
        } else {
            Vec::new()
        };
        self.reconfigure(config.enabled, config.options(), destinations);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DebugLogError, SharedBuffer};
    use tempfile::TempDir;

    #[test]
    fn test_config_serialization() {
        let config = DebugConfig {
            enabled: true,
            flags: Some(Flags::DATE | Flags::SHORT_FILE),
            verbose: false,
            files: vec![PathBuf::from("debug.log")],
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"shortfile\""));
        let parsed: DebugConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, parsed);
        assert_eq!(parsed.flags(), Flags::DATE | Flags::SHORT_FILE);
    }

    #[test]
    fn test_joined_flags_string() {
        let config: DebugConfig =
            toml::from_str("enabled = true\nflags = \"date|longfile\"\n").unwrap();
        assert_eq!(config.flags(), Flags::DATE | Flags::LONG_FILE);

        let err = serde_json::from_str::<DebugConfig>(r#"{"flags": ["date", "bogus"]}"#).unwrap_err();
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn test_defaults() {
        let config: DebugConfig = serde_json::from_str("{}").unwrap();
        assert!(!config.enabled);
        assert_eq!(config.options(), Options::default());
        assert_eq!(config.flags(), Flags::DEFAULT);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let config = DebugConfig {
            enabled: true,
            flags: Some(Flags::UTC | Flags::TIME),
            verbose: true,
            files: vec![dir.path().join("a.log")],
        };

        for name in ["settings.json", "settings.toml"] {
            let path = dir.path().join(name);
            config.to_file(&path).unwrap();
            assert_eq!(DebugConfig::from_file(&path).unwrap(), config);
        }

        let toml_text = std::fs::read_to_string(dir.path().join("settings.toml")).unwrap();
        assert!(toml_text.contains("verbose = true"));
    }

    #[test]
    fn test_empty_path_rejected() {
        let config = DebugConfig {
            files: vec![PathBuf::new()],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(DebugLogError::Config(_))));
    }

    #[test]
    fn test_apply_config_writes_files() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("nested.log");
        let config = DebugConfig {
            enabled: true,
            flags: Some(Flags::empty()),
            verbose: false,
            files: vec![log_path.clone()],
        };

        let stdout_stand_in = SharedBuffer::new();
        let logger = DebugLogger::with_default_destination(stdout_stand_in.clone().into());
        logger.apply_config(&config).unwrap();
        assert!(logger.is_enabled());

        logger.print(&[&"to", &"file"]);
        logger.apply_config(&DebugConfig::default()).unwrap();
        assert!(!logger.is_enabled());
        logger.print(&[&"skipped"]);

        assert_eq!(std::fs::read_to_string(&log_path).unwrap(), "DEBUG: to file\n");
        assert!(stdout_stand_in.is_empty());
    }

    #[test]
    fn test_apply_config_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        let config = DebugConfig {
            enabled: true,
            files: vec![dir.path().join("missing").join("x.log")],
            ..Default::default()
        };
        let logger = DebugLogger::new();

        assert!(matches!(logger.apply_config(&config), Err(DebugLogError::Io(_))));
        assert!(!logger.is_enabled());
    }
}
