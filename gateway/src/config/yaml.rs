use serde::Deserialize;
use std::path::PathBuf;

use super::ConfigError;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values present here
/// override the environment.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 8000
///   public_url: "https://abc123.ngrok.app"
///
/// elevenlabs:
///   agent_id: "your-agent-id"
///   api_key: "your-xi-api-key"   # only needed for private agents
///
/// twilio:
///   account_sid: "ACxxxxxxxx"
///   auth_token: "your-auth-token"
///   phone_number: "+15551234567"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub elevenlabs: Option<ElevenLabsYaml>,
    pub twilio: Option<TwilioYaml>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub public_url: Option<String>,
}

/// ElevenLabs Conversational AI configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ElevenLabsYaml {
    pub agent_id: Option<String>,
    pub api_key: Option<String>,
    /// Override for the conversation WebSocket endpoint
    pub ws_url: Option<String>,
    /// Override for the REST API base
    pub api_url: Option<String>,
}

/// Twilio configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TwilioYaml {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub phone_number: Option<String>,
    /// Override for the REST API base
    pub api_url: Option<String>,
}

impl YamlConfig {
    /// Load YAML configuration from a file
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.clone(),
            source,
        })?;

        serde_yaml::from_str(&contents).map_err(|source| ConfigError::ParseYaml {
            path: path.clone(),
            source,
        })
    }
}
