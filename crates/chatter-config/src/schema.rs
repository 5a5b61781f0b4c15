//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatterConfig {
    pub server: ServerConfig,
    pub realtime: RealtimeConfig,
    pub logging: LoggingConfig,
}

/// Listening socket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Per-connection limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RealtimeConfig {
    /// Frames queued for one client before further frames are dropped
    /// (valid range: 1-65536).
    pub outbound_buffer: u32,
    /// Largest accepted inbound text frame in bytes (valid range: 1 KiB-64 MiB).
    pub max_message_bytes: u32,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            outbound_buffer: 256,
            max_message_bytes: 1024 * 1024,
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Logging configuration. `RUST_LOG` takes precedence when set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ChatterConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.realtime.outbound_buffer, 256);
        assert_eq!(config.realtime.max_message_bytes, 1_048_576);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn empty_toml_is_default() {
        let config: ChatterConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn log_level_parses_uppercase() {
        let config: ChatterConfig = toml::from_str("[logging]\nlevel = \"WARNING\"\n").unwrap();
        assert_eq!(config.logging.level, LogLevel::Warning);
        assert_eq!(config.logging.level.as_directive(), "warn");
    }
}
