//! Configuration module for the bridge server
//!
//! This module handles server configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Required-setting and format checks
//!
//! # Example
//! ```rust,no_run
//! use convai_bridge::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use thiserror::Error;

mod env;
mod merge;
mod validation;
mod yaml;

/// Default listen host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_PORT: u16 = 8000;

/// Public ElevenLabs Conversational AI WebSocket endpoint
pub const DEFAULT_ELEVENLABS_WS_URL: &str = "wss://api.elevenlabs.io/v1/convai/conversation";

/// ElevenLabs REST API base, used to request signed conversation URLs
pub const DEFAULT_ELEVENLABS_API_URL: &str = "https://api.elevenlabs.io";

/// Twilio REST API base
pub const DEFAULT_TWILIO_API_URL: &str = "https://api.twilio.com";

/// Errors raised while assembling the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {}", .0.join(", "))]
    MissingRequired(Vec<&'static str>),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },

    #[error("Failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Server configuration
///
/// Contains everything needed to run the bridge:
/// - Server settings (host, port, externally reachable base URL)
/// - ElevenLabs agent settings
/// - Twilio account settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,
    /// Externally reachable base URL (e.g. an ngrok tunnel).
    /// Falls back to `http://localhost:{port}` when unset.
    pub public_url: String,

    // ElevenLabs settings
    pub elevenlabs_agent_id: String,
    /// When set, a signed conversation URL is requested before connecting,
    /// which is required for private agents.
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_ws_url: String,
    pub elevenlabs_api_url: String,

    // Twilio settings
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_phone_number: String,
    pub twilio_api_url: String,
}

/// Zeroize secret fields when ServerConfig is dropped.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        self.twilio_auth_token.zeroize();
        if let Some(ref mut key) = self.elevenlabs_api_key {
            key.zeroize();
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables only
    ///
    /// The .env file is loaded in main.rs before this is called, so its values
    /// are visible here as regular environment variables.
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value is malformed.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = merge::merge_config(None)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - A required setting is missing from both sources
    /// - Validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        let config = merge::merge_config(Some(yaml_config))?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// URL Twilio fetches the TwiML callback document from.
    pub fn callback_url(&self) -> String {
        format!(
            "{}/incoming-call-eleven",
            self.public_url.trim_end_matches('/')
        )
    }

    /// Host portion of the public base URL, including a non-default port.
    ///
    /// Used to build the media stream URL when a request carries no `Host` header.
    pub fn public_host(&self) -> String {
        match url::Url::parse(&self.public_url) {
            Ok(parsed) => match (parsed.host_str(), parsed.port()) {
                (Some(host), Some(port)) => format!("{host}:{port}"),
                (Some(host), None) => host.to_string(),
                _ => format!("localhost:{}", self.port),
            },
            Err(_) => format!("localhost:{}", self.port),
        }
    }
}
