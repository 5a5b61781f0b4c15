//! Configuration validation. Collects every violation before failing.

use chatter_common::ConfigError;

use crate::schema::ChatterConfig;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ChatterConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    if config.server.host.trim().is_empty() {
        errors.push("server.host must not be empty".into());
    }
    validate_range(&mut errors, "server.port", config.server.port.into(), 1, 65535);

    validate_range(
        &mut errors,
        "realtime.outbound_buffer",
        config.realtime.outbound_buffer,
        1,
        65536,
    );
    validate_range(
        &mut errors,
        "realtime.max_message_bytes",
        config.realtime.max_message_bytes,
        1024,
        64 * 1024 * 1024,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

/// Push an error if `value` is outside `[min, max]`.
fn validate_range(errors: &mut Vec<String>, name: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

#[cfg(test)]
mod tests;
