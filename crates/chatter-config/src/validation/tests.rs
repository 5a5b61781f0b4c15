use super::*;

#[test]
fn default_config_validates() {
    let config = ChatterConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_port_zero() {
    let mut config = ChatterConfig::default();
    config.server.port = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("server.port"));
}

#[test]
fn catches_blank_host() {
    let mut config = ChatterConfig::default();
    config.server.host = "  ".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("server.host"));
}

#[test]
fn catches_outbound_buffer_too_large() {
    let mut config = ChatterConfig::default();
    config.realtime.outbound_buffer = 100_000;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("realtime.outbound_buffer"));
}

#[test]
fn catches_max_message_bytes_too_small() {
    let mut config = ChatterConfig::default();
    config.realtime.max_message_bytes = 10;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("realtime.max_message_bytes"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = ChatterConfig::default();
    config.server.port = 0;
    config.realtime.outbound_buffer = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("server.port"));
    assert!(err.contains("realtime.outbound_buffer"));
    assert!(err.contains("; "));
}
