use std::env;

use super::ConfigError;

/// Raw settings read from the process environment
///
/// Every field is optional here; defaults and required checks are applied
/// in `merge` so YAML can fill gaps the environment leaves.
#[derive(Debug, Default)]
pub(super) struct EnvConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub public_url: Option<String>,
    pub elevenlabs_agent_id: Option<String>,
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_ws_url: Option<String>,
    pub elevenlabs_api_url: Option<String>,
    pub twilio_account_sid: Option<String>,
    pub twilio_auth_token: Option<String>,
    pub twilio_phone_number: Option<String>,
    pub twilio_api_url: Option<String>,
}

impl EnvConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            host: var("HOST"),
            port: parse_port("PORT")?,
            public_url: var("PUBLIC_URL"),
            elevenlabs_agent_id: var("ELEVENLABS_AGENT_ID"),
            elevenlabs_api_key: var("ELEVENLABS_API_KEY"),
            elevenlabs_ws_url: var("ELEVENLABS_WS_URL"),
            elevenlabs_api_url: var("ELEVENLABS_API_URL"),
            twilio_account_sid: var("TWILIO_ACCOUNT_SID"),
            twilio_auth_token: var("TWILIO_AUTH_TOKEN"),
            twilio_phone_number: var("TWILIO_PHONE_NUMBER"),
            twilio_api_url: var("TWILIO_API_URL"),
        })
    }
}

/// Read a variable, treating blank values as unset.
fn var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_port(key: &'static str) -> Result<Option<u16>, ConfigError> {
    var(key)
        .map(|raw| {
            raw.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key,
                message: format!("'{raw}' is not a valid port: {e}"),
            })
        })
        .transpose()
}
