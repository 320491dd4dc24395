//! Twilio REST client for placing outbound calls.
//!
//! # API Reference
//!
//! - Endpoint: `POST {api_base}/2010-04-01/Accounts/{AccountSid}/Calls.json`
//! - Auth: HTTP basic with the account SID and auth token
//! - Body: form encoded `To`, `From`, `Url`
//! - Response: call resource JSON; the call identifier is `sid`

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::ServerConfig;

/// Errors that can occur while talking to the telephony provider.
#[derive(Debug, Error)]
pub enum TelephonyError {
    /// Request never produced a response
    #[error("Request to telephony provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("Telephony provider returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body did not contain a call identifier
    #[error("Invalid response from telephony provider: {0}")]
    InvalidResponse(String),
}

/// Result type for telephony operations.
pub type TelephonyResult<T> = Result<T, TelephonyError>;

/// Places outbound calls through a telephony provider.
#[async_trait]
pub trait CallProvider: Send + Sync {
    /// Ask the provider to dial `to`, fetching call instructions from `callback_url`.
    ///
    /// Returns the provider-assigned call identifier.
    async fn create_call(&self, to: &str, callback_url: &str) -> TelephonyResult<String>;
}

/// Subset of the Twilio call resource the bridge reads.
#[derive(Debug, Deserialize)]
struct CallResource {
    sid: Option<String>,
}

/// Twilio error body (`{"code": 21211, "message": "...", "status": 400}`).
#[derive(Debug, Deserialize)]
struct TwilioApiError {
    #[serde(default)]
    code: Option<u32>,
    #[serde(default)]
    message: Option<String>,
}

/// Twilio implementation of [`CallProvider`].
pub struct TwilioClient {
    http: reqwest::Client,
    api_base: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl TwilioClient {
    pub fn new(
        api_base: impl Into<String>,
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        from_number: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into(),
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            from_number: from_number.into(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            config.twilio_api_url.clone(),
            config.twilio_account_sid.clone(),
            config.twilio_auth_token.clone(),
            config.twilio_phone_number.clone(),
        )
    }

    fn calls_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Calls.json",
            self.api_base.trim_end_matches('/'),
            self.account_sid
        )
    }
}

impl Drop for TwilioClient {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        self.auth_token.zeroize();
    }
}

#[async_trait]
impl CallProvider for TwilioClient {
    async fn create_call(&self, to: &str, callback_url: &str) -> TelephonyResult<String> {
        debug!(to, callback_url, "Creating Twilio call");

        let response = self
            .http
            .post(self.calls_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[
                ("To", to),
                ("From", self.from_number.as_str()),
                ("Url", callback_url),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<TwilioApiError>(&body) {
                Ok(TwilioApiError {
                    code: Some(code),
                    message: Some(message),
                }) => format!("{message} (code {code})"),
                Ok(TwilioApiError {
                    message: Some(message),
                    ..
                }) => message,
                _ => body,
            };
            return Err(TelephonyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let resource: CallResource = response
            .json()
            .await
            .map_err(|e| TelephonyError::InvalidResponse(e.to_string()))?;

        let sid = resource
            .sid
            .filter(|sid| !sid.is_empty())
            .ok_or_else(|| TelephonyError::InvalidResponse("missing call sid".to_string()))?;

        info!(call_sid = %sid, "Twilio call created");
        Ok(sid)
    }
}
