use super::{ConfigError, ServerConfig};

/// Validate the merged configuration.
///
/// Checks URL shapes so that a typo fails at startup rather than on the first call.
pub(super) fn validate(config: &ServerConfig) -> Result<(), ConfigError> {
    validate_url("PUBLIC_URL", &config.public_url, &["http", "https"])?;
    validate_url("ELEVENLABS_WS_URL", &config.elevenlabs_ws_url, &["ws", "wss"])?;
    validate_url(
        "ELEVENLABS_API_URL",
        &config.elevenlabs_api_url,
        &["http", "https"],
    )?;
    validate_url("TWILIO_API_URL", &config.twilio_api_url, &["http", "https"])?;
    Ok(())
}

fn validate_url(key: &'static str, value: &str, schemes: &[&str]) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        key,
        message: format!("'{value}' is not a valid URL: {e}"),
    })?;

    if !schemes.contains(&parsed.scheme()) {
        return Err(ConfigError::InvalidValue {
            key,
            message: format!(
                "scheme '{}' not allowed, expected one of {:?}",
                parsed.scheme(),
                schemes
            ),
        });
    }

    Ok(())
}
