use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ChatterError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Protocol(String),
}

impl From<serde_json::Error> for ChatterError {
    fn from(e: serde_json::Error) -> Self {
        ChatterError::Protocol(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("server.port = 0 is out of range".into());
        assert_eq!(
            err.to_string(),
            "config validation error: server.port = 0 is out of range"
        );
    }

    #[test]
    fn chatter_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: ChatterError = config_err.into();
        assert!(matches!(err, ChatterError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn chatter_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
        let err: ChatterError = io_err.into();
        assert!(matches!(err, ChatterError::Io(_)));
        assert!(err.to_string().contains("port taken"));
    }

    #[test]
    fn chatter_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ChatterError = json_err.into();
        assert!(matches!(err, ChatterError::Protocol(_)));
        assert!(err.to_string().starts_with("protocol error: "));
    }
}
