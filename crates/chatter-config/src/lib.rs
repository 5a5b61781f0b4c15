//! Configuration for the chatter realtime server.
//!
//! TOML-based, every section uses `serde(default)` so partial files work
//! out of the box. Command-line flags override file values in the binary,
//! which validates once after applying them.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{ChatterConfig, LogLevel, LoggingConfig, RealtimeConfig, ServerConfig};

use std::fmt;
use std::path::{Path, PathBuf};

use chatter_common::ConfigError;

/// Where a loaded config came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// Nothing at the default path.
    Defaults { looked_at: PathBuf },
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults { looked_at } => {
                write!(f, "defaults (no file at {})", looked_at.display())
            }
        }
    }
}

/// Load the configuration without validating it.
///
/// An explicit `path` must exist. Without one, the platform default path is
/// tried and defaults are used when nothing is there.
pub fn load(path: Option<&Path>) -> Result<(ChatterConfig, ConfigSource), ConfigError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let default = toml_loader::default_config_path()?;
            if !default.exists() {
                return Ok((
                    ChatterConfig::default(),
                    ConfigSource::Defaults { looked_at: default },
                ));
            }
            default
        }
    };
    let config = toml_loader::load_from_path(&path)?;
    Ok((config, ConfigSource::File(path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_missing_path_is_file_not_found() {
        let err = load(Some(Path::new("/tmp/chatter_missing_config.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn explicit_path_is_reported_as_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("realtime.toml");
        std::fs::write(&path, "[server]\nport = 6000\n").unwrap();

        let (config, source) = load(Some(&path)).unwrap();
        assert_eq!(config.server.port, 6000);
        assert_eq!(source, ConfigSource::File(path.clone()));
        assert_eq!(source.to_string(), path.display().to_string());
    }

    #[test]
    fn out_of_range_file_value_can_be_overridden_before_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("realtime.toml");
        std::fs::write(&path, "[server]\nport = 0\n").unwrap();

        let (mut config, _) = load(Some(&path)).unwrap();
        assert!(validation::validate(&config).is_err());

        config.server.port = 7000;
        assert!(validation::validate(&config).is_ok());
    }

    #[test]
    fn invalid_values_are_rejected_by_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("realtime.toml");
        std::fs::write(&path, "[realtime]\noutbound_buffer = 0\n").unwrap();

        let (config, _) = load(Some(&path)).unwrap();
        let err = validation::validate(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("realtime.outbound_buffer"));
    }

    #[test]
    fn defaults_source_names_the_path() {
        let source = ConfigSource::Defaults {
            looked_at: PathBuf::from("/etc/chatter/realtime.toml"),
        };
        assert_eq!(
            source.to_string(),
            "defaults (no file at /etc/chatter/realtime.toml)"
        );
    }
}
