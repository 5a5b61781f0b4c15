//! TOML config file loading and creation.

use std::path::{Path, PathBuf};

use chatter_common::ConfigError;

use crate::schema::ChatterConfig;

/// Load config from a specific TOML file path.
///
/// Missing fields are filled by serde defaults. Validation is left to the
/// caller.
pub fn load_from_path(path: &Path) -> Result<ChatterConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::ParseError(format!("failed to read {}: {e}", path.display()))
    })?;

    let config: ChatterConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    Ok(config)
}

/// Get the platform-specific default config file path.
///
/// On Linux: `~/.config/chatter/realtime.toml`
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or_else(|| {
        ConfigError::ParseError("could not determine config directory".into())
    })?;
    Ok(config_dir.join("chatter").join("realtime.toml"))
}

/// Write a commented default config file, creating parent directories.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to create config directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    std::fs::write(path, default_config_toml()).map_err(|e| {
        ConfigError::ParseError(format!(
            "failed to write default config to {}: {e}",
            path.display()
        ))
    })?;

    Ok(())
}

fn default_config_toml() -> &'static str {
    r#"# chatter realtime server configuration
# Only override what you want to change -- missing fields use defaults.

[server]
# host = "0.0.0.0"
# port = 5000

[realtime]
# outbound_buffer = 256          # 1-65536 frames queued per client
# max_message_bytes = 1048576    # 1024-67108864

[logging]
# level = "INFO"                 # TRACE, DEBUG, INFO, WARNING, ERROR
"#
}
