use super::env::EnvConfig;
use super::yaml::YamlConfig;
use super::{
    ConfigError, DEFAULT_ELEVENLABS_API_URL, DEFAULT_ELEVENLABS_WS_URL, DEFAULT_HOST,
    DEFAULT_PORT, DEFAULT_TWILIO_API_URL, ServerConfig,
};

/// Merge environment settings with optional YAML overrides.
///
/// YAML wins over the environment; defaults fill whatever neither provides.
/// Every missing required setting is collected before failing so operators
/// see the full list at once.
pub(super) fn merge_config(yaml: Option<YamlConfig>) -> Result<ServerConfig, ConfigError> {
    let env = EnvConfig::load()?;
    let yaml = yaml.unwrap_or_default();
    let server = yaml.server.unwrap_or_default();
    let elevenlabs = yaml.elevenlabs.unwrap_or_default();
    let twilio = yaml.twilio.unwrap_or_default();

    let host = pick(server.host, env.host).unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = server.port.or(env.port).unwrap_or(DEFAULT_PORT);
    let public_url =
        pick(server.public_url, env.public_url).unwrap_or_else(|| format!("http://localhost:{port}"));

    let agent_id = pick(elevenlabs.agent_id, env.elevenlabs_agent_id);
    let account_sid = pick(twilio.account_sid, env.twilio_account_sid);
    let auth_token = pick(twilio.auth_token, env.twilio_auth_token);
    let phone_number = pick(twilio.phone_number, env.twilio_phone_number);

    let mut missing = Vec::new();
    if agent_id.is_none() {
        missing.push("ELEVENLABS_AGENT_ID");
    }
    if account_sid.is_none() {
        missing.push("TWILIO_ACCOUNT_SID");
    }
    if auth_token.is_none() {
        missing.push("TWILIO_AUTH_TOKEN");
    }
    if phone_number.is_none() {
        missing.push("TWILIO_PHONE_NUMBER");
    }

    let (Some(agent_id), Some(account_sid), Some(auth_token), Some(phone_number)) =
        (agent_id, account_sid, auth_token, phone_number)
    else {
        return Err(ConfigError::MissingRequired(missing));
    };

    Ok(ServerConfig {
        host,
        port,
        public_url,
        elevenlabs_agent_id: agent_id,
        elevenlabs_api_key: pick(elevenlabs.api_key, env.elevenlabs_api_key),
        elevenlabs_ws_url: pick(elevenlabs.ws_url, env.elevenlabs_ws_url)
            .unwrap_or_else(|| DEFAULT_ELEVENLABS_WS_URL.to_string()),
        elevenlabs_api_url: pick(elevenlabs.api_url, env.elevenlabs_api_url)
            .unwrap_or_else(|| DEFAULT_ELEVENLABS_API_URL.to_string()),
        twilio_account_sid: account_sid,
        twilio_auth_token: auth_token,
        twilio_phone_number: phone_number,
        twilio_api_url: pick(twilio.api_url, env.twilio_api_url)
            .unwrap_or_else(|| DEFAULT_TWILIO_API_URL.to_string()),
    })
}

/// YAML value if present and non-blank, otherwise the environment value.
fn pick(yaml: Option<String>, env: Option<String>) -> Option<String> {
    yaml.map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or(env)
}
